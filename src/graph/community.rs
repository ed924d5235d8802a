//! Undirected weighted connectivity graph over sequence identifiers

use crate::graph::distance::{validate_distance_threshold, DistanceTable};
use crate::graph::NodeSet;
use anyhow::Result;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Attributes carried by a single edge
///
/// Endpoints are fixed at insertion; only the attributes are mutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData {
    /// Similarity weight, overwritten with the distance by filtering
    pub weight: f64,

    /// Pairwise distance recorded by annotation, absent until annotated
    pub distance: Option<f64>,
}

/// Connectivity graph of related sequence clusters.
///
/// Simple (no parallel edges, no self loops), undirected, possibly
/// disconnected, possibly containing isolated nodes. The upstream
/// pre-processing stage has already stripped hub nodes; its parameters are
/// carried along so induced subgraphs keep the provenance of their parent.
#[derive(Debug, Clone)]
pub struct CommunityGraph {
    graph: UnGraph<String, EdgeData>,
    indices: HashMap<String, NodeIndex>,
    hub_connectivity_threshold: usize,
    edge_density: f64,
    label: String,
    colour_index: Option<usize>,
}

impl CommunityGraph {
    /// Create an empty graph carrying the pre-processing parameters
    pub fn new(hub_connectivity_threshold: usize, edge_density: f64) -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            indices: HashMap::new(),
            hub_connectivity_threshold,
            edge_density,
            label: String::from("graph"),
            colour_index: None,
        }
    }

    /// Set the visual label for this graph
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Add a node if it is not already present
    pub fn add_node(&mut self, id: &str) {
        if !self.indices.contains_key(id) {
            let idx = self.graph.add_node(id.to_string());
            self.indices.insert(id.to_string(), idx);
        }
    }

    /// Add an undirected edge, creating endpoints as needed
    ///
    /// Re-adding an existing edge overwrites its attributes, keeping the
    /// graph simple. Self loops are ignored.
    pub fn add_edge(&mut self, u: &str, v: &str, weight: f64) {
        self.upsert_edge(
            u,
            v,
            EdgeData {
                weight,
                distance: None,
            },
        );
    }

    fn upsert_edge(&mut self, u: &str, v: &str, data: EdgeData) {
        if u == v {
            log::debug!("Ignoring self loop on node {}", u);
            return;
        }
        self.add_node(u);
        self.add_node(v);
        let a = self.indices[u];
        let b = self.indices[v];
        self.graph.update_edge(a, b, data);
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the node is present
    pub fn contains_node(&self, id: &str) -> bool {
        self.indices.contains_key(id)
    }

    /// Node identifiers in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// All node identifiers as an ordered set
    pub fn node_set(&self) -> NodeSet {
        self.nodes().map(|n| n.to_string()).collect()
    }

    /// Edges with their attributes
    pub fn edges(&self) -> Vec<(&str, &str, &EdgeData)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].as_str(),
                    self.graph[edge.target()].as_str(),
                    edge.weight(),
                )
            })
            .collect()
    }

    /// Whether an edge connects the two nodes
    pub fn has_edge(&self, u: &str, v: &str) -> bool {
        self.edge_data(u, v).is_some()
    }

    /// Attributes of the edge between two nodes, if present
    pub fn edge_data(&self, u: &str, v: &str) -> Option<&EdgeData> {
        let a = self.indices.get(u)?;
        let b = self.indices.get(v)?;
        let edge = self.graph.find_edge(*a, *b)?;
        self.graph.edge_weight(edge)
    }

    /// Graph-neighbors of a node (empty for unknown nodes)
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        match self.indices.get(id) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of edges incident to a node
    pub fn degree(&self, id: &str) -> usize {
        match self.indices.get(id) {
            Some(&idx) => self.graph.neighbors(idx).count(),
            None => 0,
        }
    }

    /// Neighbors of a node together with the connecting edge weight
    pub fn neighbor_weights(&self, id: &str) -> Vec<(&str, f64)> {
        match self.indices.get(id) {
            Some(&idx) => self
                .graph
                .edges(idx)
                .map(|edge| {
                    let other = if edge.source() == idx {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    (self.graph[other].as_str(), edge.weight().weight)
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Hub connectivity threshold inherited from pre-processing
    pub fn hub_connectivity_threshold(&self) -> usize {
        self.hub_connectivity_threshold
    }

    /// Edge density parameter inherited from pre-processing
    pub fn edge_density(&self) -> f64 {
        self.edge_density
    }

    /// Visual label of this graph
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the visual label
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Colour index assigned by the partitioner, if any
    pub fn colour_index(&self) -> Option<usize> {
        self.colour_index
    }

    /// Assign the colour index
    pub fn set_colour_index(&mut self, colour: usize) {
        self.colour_index = Some(colour);
    }

    /// Remove the edge between two nodes, keeping both endpoints
    ///
    /// Returns whether an edge was removed.
    pub fn remove_edge(&mut self, u: &str, v: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.indices.get(u), self.indices.get(v)) else {
            return false;
        };
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Build the subgraph induced by a set of nodes
    ///
    /// The subgraph is a fresh graph carrying the parent's pre-processing
    /// parameters and label; nodes absent from the parent are skipped.
    pub fn induced_subgraph(&self, nodes: &NodeSet) -> CommunityGraph {
        let mut subgraph = CommunityGraph::new(self.hub_connectivity_threshold, self.edge_density)
            .with_label(&self.label);
        subgraph.colour_index = self.colour_index;

        for node in nodes {
            if self.indices.contains_key(node.as_str()) {
                subgraph.add_node(node);
            }
        }

        for edge in self.graph.edge_references() {
            let u = self.graph[edge.source()].as_str();
            let v = self.graph[edge.target()].as_str();
            if nodes.contains(u) && nodes.contains(v) {
                subgraph.upsert_edge(u, v, *edge.weight());
            }
        }

        subgraph
    }

    /// Connected components as ordered node sets
    ///
    /// Components are ordered by first node appearance, so the result is
    /// stable across runs for identical construction order. Isolated nodes
    /// form singleton components.
    pub fn components(&self) -> Vec<NodeSet> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut components: Vec<NodeSet> = Vec::new();
        let mut root_to_component: HashMap<usize, usize> = HashMap::new();

        for idx in self.graph.node_indices() {
            let root = sets.find(idx.index());
            let component = *root_to_component.entry(root).or_insert_with(|| {
                components.push(NodeSet::new());
                components.len() - 1
            });
            components[component].insert(self.graph[idx].clone());
        }

        components
    }

    /// Record the pairwise distance on every existing edge
    ///
    /// Pairs missing from the table are stored as infinite. Pure attribute
    /// side effect; no edge is ever removed or added.
    pub fn annotate_distances(&mut self, distances: &DistanceTable) {
        let lookups: Vec<(EdgeIndex, f64)> = self
            .graph
            .edge_references()
            .map(|edge| {
                let u = self.graph[edge.source()].as_str();
                let v = self.graph[edge.target()].as_str();
                (edge.id(), distances.distance_or_infinite(u, v))
            })
            .collect();

        for (edge, distance) in lookups {
            if let Some(data) = self.graph.edge_weight_mut(edge) {
                data.distance = Some(distance);
            }
        }
    }

    /// Remove edges whose table distance exceeds the threshold
    ///
    /// Retained edges get their weight overwritten with the distance.
    /// Edges at exactly the threshold are retained. Returns the number of
    /// removed edges.
    pub fn filter_by_distance(
        &mut self,
        distances: &DistanceTable,
        threshold: f64,
    ) -> Result<usize> {
        validate_distance_threshold(threshold)?;

        let mut to_remove: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        let mut to_reweight: Vec<(EdgeIndex, f64)> = Vec::new();

        for edge in self.graph.edge_references() {
            let u = self.graph[edge.source()].as_str();
            let v = self.graph[edge.target()].as_str();
            let distance = distances.distance_or_infinite(u, v);
            if distance > threshold {
                to_remove.push((edge.source(), edge.target()));
            } else {
                to_reweight.push((edge.id(), distance));
            }
        }

        // reweight before removal: edge indices are invalidated by remove_edge
        for (edge, distance) in to_reweight {
            if let Some(data) = self.graph.edge_weight_mut(edge) {
                data.weight = distance;
            }
        }

        let removed = to_remove.len();
        for (a, b) in to_remove {
            if let Some(edge) = self.graph.find_edge(a, b) {
                self.graph.remove_edge(edge);
            }
        }

        log::debug!(
            "Distance filter removed {} of {} edges at threshold {}",
            removed,
            removed + self.graph.edge_count(),
            threshold
        );

        Ok(removed)
    }

    /// Remove edges whose previously annotated distance exceeds the threshold
    ///
    /// Reads the stored distance attribute (missing counts as infinite) and
    /// leaves edge weights untouched. Returns the number of removed edges.
    pub fn filter_by_annotated_distance(&mut self, threshold: f64) -> Result<usize> {
        validate_distance_threshold(threshold)?;

        let to_remove: Vec<(NodeIndex, NodeIndex)> = self
            .graph
            .edge_references()
            .filter(|edge| edge.weight().distance.unwrap_or(f64::INFINITY) > threshold)
            .map(|edge| (edge.source(), edge.target()))
            .collect();

        let removed = to_remove.len();
        for (a, b) in to_remove {
            if let Some(edge) = self.graph.find_edge(a, b) {
                self.graph.remove_edge(edge);
            }
        }

        Ok(removed)
    }
}

impl Default for CommunityGraph {
    fn default() -> Self {
        Self::new(0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_set(ids: &[&str]) -> NodeSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn table(entries: &[(&str, &str, f64)]) -> DistanceTable {
        let mut table = DistanceTable::new();
        for (a, b, d) in entries {
            table.insert(a, b, *d).unwrap();
        }
        table
    }

    #[test]
    fn test_graph_stays_simple() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "a", 2.0);
        graph.add_edge("a", "a", 1.0);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_data("a", "b").unwrap().weight, 2.0);
    }

    #[test]
    fn test_components_include_isolated_nodes() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 1.0);
        graph.add_edge("d", "e", 1.0);
        graph.add_node("f");

        let components = graph.components();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0], node_set(&["a", "b", "c"]));
        assert_eq!(components[1], node_set(&["d", "e"]));
        assert_eq!(components[2], node_set(&["f"]));
    }

    #[test]
    fn test_induced_subgraph_carries_configuration() {
        let mut graph = CommunityGraph::new(50, 0.2).with_label("community_0");
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 1.0);
        graph.add_edge("c", "d", 1.0);

        let nodes = node_set(&["a", "b", "c"]);
        let subgraph = graph.induced_subgraph(&nodes);

        assert_eq!(subgraph.node_count(), 3);
        assert_eq!(subgraph.edge_count(), 2);
        assert!(!subgraph.has_edge("c", "d"));
        assert_eq!(subgraph.hub_connectivity_threshold(), 50);
        assert_eq!(subgraph.edge_density(), 0.2);
        assert_eq!(subgraph.label(), "community_0");
    }

    #[test]
    fn test_filter_threshold_boundary() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 1.0);
        let distances = table(&[("a", "b", 5.0), ("b", "c", 6.0)]);

        let removed = graph.filter_by_distance(&distances, 5.0).unwrap();

        assert_eq!(removed, 1);
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "c"));
        // retained edge weight is overwritten with the distance
        assert_eq!(graph.edge_data("a", "b").unwrap().weight, 5.0);
    }

    #[test]
    fn test_filter_removes_unknown_pairs() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("x", "y", 1.0);

        let removed = graph.filter_by_distance(&DistanceTable::new(), 5.0).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_filter_rejects_invalid_threshold() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 1.0);

        assert!(graph.filter_by_distance(&DistanceTable::new(), -1.0).is_err());
        assert!(graph.filter_by_annotated_distance(f64::NAN).is_err());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 1.0);
        let distances = table(&[("a", "b", 0.3)]);

        graph.annotate_distances(&distances);
        graph.annotate_distances(&distances);

        assert_eq!(graph.edge_data("a", "b").unwrap().distance, Some(0.3));
        let missing = graph.edge_data("b", "c").unwrap().distance;
        assert!(missing.unwrap().is_infinite());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_filter_by_annotated_distance_keeps_weight() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 7.0);
        graph.add_edge("b", "c", 7.0);
        let distances = table(&[("a", "b", 0.4), ("b", "c", 0.9)]);

        graph.annotate_distances(&distances);
        let removed = graph.filter_by_annotated_distance(0.5).unwrap();

        assert_eq!(removed, 1);
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "c"));
        assert_eq!(graph.edge_data("a", "b").unwrap().weight, 7.0);
    }
}
