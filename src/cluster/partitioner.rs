//! Orchestration of detection, repair, and subgraph materialization

use crate::cluster::detection::CommunityDetection;
use crate::cluster::repair::merge_small_subcommunities;
use crate::graph::CommunityGraph;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Colour given to nodes missing from a reference colouring
pub const DEFAULT_COLOUR: usize = 0;

/// Splits a community graph into subcommunity subgraphs
///
/// Composes a detection strategy with the repair pass, then materializes
/// one induced subgraph per surviving node set. Output order follows the
/// repaired partition, so identical inputs produce identical output
/// across runs.
pub struct Partitioner<D: CommunityDetection> {
    detector: D,
}

impl<D: CommunityDetection> Partitioner<D> {
    /// Create a partitioner around a detection strategy
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Partition the graph into subcommunity subgraphs
    ///
    /// Each subgraph carries the parent's pre-processing parameters, a
    /// label derived from the parent's, and a colour index matching its
    /// output position.
    pub fn split(
        &self,
        graph: &CommunityGraph,
        size_threshold: usize,
    ) -> Result<Vec<CommunityGraph>> {
        let raw = self.detector.detect(graph)?;
        log::debug!(
            "{}: detection proposed {} raw subcommunities",
            graph.label(),
            raw.len()
        );

        let repaired = merge_small_subcommunities(graph, raw, size_threshold);

        let subcommunities = repaired
            .iter()
            .enumerate()
            .map(|(position, nodes)| {
                let mut subcommunity = graph.induced_subgraph(nodes);
                subcommunity.set_label(&format!("{}_subcommunity_{}", graph.label(), position));
                subcommunity.set_colour_index(position);
                subcommunity
            })
            .collect::<Vec<_>>();

        log::info!(
            "{}: split into {} subcommunities",
            graph.label(),
            subcommunities.len()
        );
        Ok(subcommunities)
    }
}

/// Side table mapping nodes to colour indices.
///
/// Owned by the output-producing step and passed by reference wherever a
/// later graph needs to be recoloured to match an earlier one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeColours {
    colours: HashMap<String, usize>,
}

impl NodeColours {
    /// Create an empty colouring
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every subcommunity node under that subcommunity's colour
    pub fn from_subcommunities(subcommunities: &[CommunityGraph]) -> Self {
        let mut table = Self::new();
        for (position, subcommunity) in subcommunities.iter().enumerate() {
            let colour = subcommunity.colour_index().unwrap_or(position);
            for node in subcommunity.nodes() {
                table.colours.insert(node.to_string(), colour);
            }
        }
        table
    }

    /// Colour a graph's nodes by identity from a reference colouring
    ///
    /// Nodes absent from the reference get the default colour.
    pub fn recoloured(graph: &CommunityGraph, reference: &NodeColours) -> Self {
        let mut table = Self::new();
        for node in graph.nodes() {
            table.colours.insert(node.to_string(), reference.colour(node));
        }
        table
    }

    /// Colour of a node, default for unknown nodes
    pub fn colour(&self, node: &str) -> usize {
        self.colours.get(node).copied().unwrap_or(DEFAULT_COLOUR)
    }

    /// Number of coloured nodes
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Whether no node has been coloured
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::detection::LabelPropagation;
    use crate::graph::NodeSet;

    fn node_set(ids: &[&str]) -> NodeSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_split_two_components() {
        let mut graph = CommunityGraph::new(50, 0.2).with_label("community_0");
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 1.0);
        graph.add_edge("d", "e", 1.0);

        let partitioner = Partitioner::new(LabelPropagation::new());
        let subcommunities = partitioner.split(&graph, 1).unwrap();

        assert_eq!(subcommunities.len(), 2);
        let sets: Vec<NodeSet> = subcommunities.iter().map(|s| s.node_set()).collect();
        assert!(sets.contains(&node_set(&["a", "b", "c"])));
        assert!(sets.contains(&node_set(&["d", "e"])));
    }

    #[test]
    fn test_split_carries_configuration_and_colours() {
        let mut graph = CommunityGraph::new(50, 0.2).with_label("community_3");
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("c", "d", 1.0);

        let partitioner = Partitioner::new(LabelPropagation::new());
        let subcommunities = partitioner.split(&graph, 1).unwrap();

        for (position, subcommunity) in subcommunities.iter().enumerate() {
            assert_eq!(subcommunity.hub_connectivity_threshold(), 50);
            assert_eq!(subcommunity.edge_density(), 0.2);
            assert_eq!(subcommunity.colour_index(), Some(position));
            assert_eq!(
                subcommunity.label(),
                format!("community_3_subcommunity_{}", position)
            );
        }
    }

    #[test]
    fn test_split_covers_all_nodes_disjointly() {
        let mut graph = CommunityGraph::default();
        for (u, v) in [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d"), ("e", "f"), ("f", "g")] {
            graph.add_edge(u, v, 1.0);
        }
        graph.add_node("lone");

        let partitioner = Partitioner::new(LabelPropagation::new());
        let subcommunities = partitioner.split(&graph, 1).unwrap();

        let total: usize = subcommunities.iter().map(|s| s.node_count()).sum();
        assert_eq!(total, graph.node_count());
        let union: NodeSet = subcommunities.iter().flat_map(|s| s.node_set()).collect();
        assert_eq!(union, graph.node_set());
    }

    #[test]
    fn test_split_single_node_graph() {
        let mut graph = CommunityGraph::default();
        graph.add_node("z");

        let partitioner = Partitioner::new(LabelPropagation::new());
        let subcommunities = partitioner.split(&graph, 1).unwrap();

        assert_eq!(subcommunities.len(), 1);
        assert_eq!(subcommunities[0].node_set(), node_set(&["z"]));
    }

    #[test]
    fn test_split_empty_graph_yields_nothing() {
        let graph = CommunityGraph::default();
        let partitioner = Partitioner::new(LabelPropagation::new());
        assert!(partitioner.split(&graph, 1).unwrap().is_empty());
    }

    #[test]
    fn test_recolouring_copies_by_identity() {
        let mut graph = CommunityGraph::default();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("c", "d", 1.0);

        let partitioner = Partitioner::new(LabelPropagation::new());
        let subcommunities = partitioner.split(&graph, 1).unwrap();
        let reference = NodeColours::from_subcommunities(&subcommunities);

        let mut later = CommunityGraph::default();
        later.add_edge("a", "b", 1.0);
        later.add_node("unseen");

        let recoloured = NodeColours::recoloured(&later, &reference);
        assert_eq!(recoloured.colour("a"), reference.colour("a"));
        assert_eq!(recoloured.colour("b"), reference.colour("b"));
        assert_eq!(recoloured.colour("unseen"), DEFAULT_COLOUR);
    }
}
