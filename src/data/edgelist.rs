//! Connectivity graph loading from edge-list files

use crate::graph::CommunityGraph;
use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Load a connectivity graph from a whitespace-separated edge list
///
/// Each line is `node_1 node_2 [weight]` with the weight defaulting to
/// 1.0. A line with a single identifier adds an isolated node. Empty
/// lines and `#` comments are skipped. The graph is assumed to have had
/// its hub nodes stripped upstream; the pre-processing parameters are
/// recorded on the graph as provenance.
pub fn load_edge_list(
    path: &str,
    hub_connectivity_threshold: usize,
    edge_density: f64,
) -> Result<CommunityGraph> {
    log::info!("Reading edge list: {}", path);

    let file = File::open(path).map_err(|e| anyhow!("cannot open {}: {}", path, e))?;
    let reader = BufReader::new(file);

    let mut graph = CommunityGraph::new(hub_connectivity_threshold, edge_density);
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(u), Some(v)) => {
                let weight = fields
                    .next()
                    .map(str::parse::<f64>)
                    .transpose()
                    .map_err(|e| anyhow!("{}:{}: bad edge weight: {}", path, number + 1, e))?
                    .unwrap_or(1.0);
                graph.add_edge(u, v, weight);
            }
            (Some(u), None) => graph.add_node(u),
            _ => {}
        }
    }

    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
