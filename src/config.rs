//! Configuration management for the sequence community partitioner

/// Default configuration for a partitioning run
pub struct Config {
    /// Subcommunities of this size or smaller are merged into larger neighbors
    pub size_threshold: usize,

    /// Edges whose pairwise distance exceeds this value are removed
    pub distance_threshold: f64,

    /// Use the hierarchical modularity search instead of label propagation
    pub hierarchical: bool,

    /// Hub connectivity threshold used by the upstream pre-processing stage
    pub hub_connectivity_threshold: usize,

    /// Edge density parameter used by the upstream pre-processing stage
    pub edge_density: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size_threshold: 4,
            distance_threshold: 0.5,
            hierarchical: false,
            hub_connectivity_threshold: 50,
            edge_density: 0.2,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        size_threshold: usize,
        distance_threshold: f64,
        hierarchical: bool,
        hub_connectivity_threshold: usize,
        edge_density: f64,
    ) -> Self {
        Self {
            size_threshold,
            distance_threshold,
            hierarchical,
            hub_connectivity_threshold,
            edge_density,
        }
    }
}
