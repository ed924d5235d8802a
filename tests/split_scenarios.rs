//! End-to-end partitioning scenarios

use sequence_community_partitioner::cluster::{
    GirvanNewman, LabelPropagation, NodeColours, Partitioner,
};
use sequence_community_partitioner::graph::{CommunityGraph, DistanceTable, NodeSet};
use sequence_community_partitioner::storage;

fn node_set(ids: &[&str]) -> NodeSet {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn two_components_stay_separate_subcommunities() {
    let mut graph = CommunityGraph::default().with_label("community_0");
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("B", "C", 1.0);
    graph.add_edge("D", "E", 1.0);

    let partitioner = Partitioner::new(LabelPropagation::new());
    let subcommunities = partitioner.split(&graph, 1).unwrap();

    assert_eq!(subcommunities.len(), 2);
    let sets: Vec<NodeSet> = subcommunities.iter().map(|s| s.node_set()).collect();
    assert!(sets.contains(&node_set(&["A", "B", "C"])));
    assert!(sets.contains(&node_set(&["D", "E"])));
}

#[test]
fn isolated_node_survives_as_singleton_subcommunity() {
    let mut graph = CommunityGraph::default();
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("B", "C", 1.0);
    graph.add_edge("A", "C", 1.0);
    graph.add_node("D");

    let partitioner = Partitioner::new(GirvanNewman::new());
    let subcommunities = partitioner.split(&graph, 1).unwrap();

    assert_eq!(subcommunities.len(), 2);
    let sets: Vec<NodeSet> = subcommunities.iter().map(|s| s.node_set()).collect();
    assert!(sets.contains(&node_set(&["A", "B", "C"])));
    assert!(sets.contains(&node_set(&["D"])));
}

#[test]
fn unknown_pair_distance_filters_the_edge() {
    let mut graph = CommunityGraph::default();
    graph.add_edge("X", "Y", 1.0);

    let removed = graph.filter_by_distance(&DistanceTable::new(), 5.0).unwrap();

    assert_eq!(removed, 1);
    assert!(!graph.has_edge("X", "Y"));
}

#[test]
fn single_node_graph_short_circuits() {
    let mut graph = CommunityGraph::default();
    graph.add_node("Z");

    for subcommunities in [
        Partitioner::new(LabelPropagation::new()).split(&graph, 1).unwrap(),
        Partitioner::new(GirvanNewman::new()).split(&graph, 1).unwrap(),
    ] {
        assert_eq!(subcommunities.len(), 1);
        assert_eq!(subcommunities[0].node_set(), node_set(&["Z"]));
    }
}

#[test]
fn coverage_and_disjointness_hold_for_both_strategies() {
    let mut graph = CommunityGraph::default();
    for (u, v) in [
        ("a", "b"),
        ("b", "c"),
        ("a", "c"),
        ("c", "d"),
        ("d", "e"),
        ("e", "f"),
        ("d", "f"),
        ("g", "h"),
    ] {
        graph.add_edge(u, v, 1.0);
    }
    graph.add_node("lone");

    for subcommunities in [
        Partitioner::new(LabelPropagation::new()).split(&graph, 1).unwrap(),
        Partitioner::new(GirvanNewman::new()).split(&graph, 1).unwrap(),
    ] {
        let total: usize = subcommunities.iter().map(|s| s.node_count()).sum();
        assert_eq!(total, graph.node_count());

        let union: NodeSet = subcommunities.iter().flat_map(|s| s.node_set()).collect();
        assert_eq!(union, graph.node_set());
    }
}

#[test]
fn split_output_round_trips_through_snapshot() {
    let mut graph = CommunityGraph::default().with_label("community_0");
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("B", "C", 1.0);
    graph.add_edge("D", "E", 1.0);

    let partitioner = Partitioner::new(LabelPropagation::new());
    let subcommunities = partitioner.split(&graph, 1).unwrap();
    let partitions: Vec<NodeSet> = subcommunities.iter().map(|s| s.node_set()).collect();

    let mut path = std::env::temp_dir();
    path.push(format!(
        "seq-community-partitioner-{}-scenario.bin",
        std::process::id()
    ));

    storage::save_snapshot(&partitions, &path).unwrap();
    let loaded = storage::load_snapshot(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, partitions);
}

#[test]
fn recolouring_matches_reference_by_node_identity() {
    let mut graph = CommunityGraph::default().with_label("community_0");
    graph.add_edge("A", "B", 1.0);
    graph.add_edge("C", "D", 1.0);

    let partitioner = Partitioner::new(LabelPropagation::new());
    let subcommunities = partitioner.split(&graph, 1).unwrap();
    let reference = NodeColours::from_subcommunities(&subcommunities);

    // a later graph over an overlapping node set
    let mut later = CommunityGraph::default();
    later.add_edge("A", "C", 1.0);
    later.add_node("new");

    let recoloured = NodeColours::recoloured(&later, &reference);
    assert_eq!(recoloured.colour("A"), reference.colour("A"));
    assert_eq!(recoloured.colour("C"), reference.colour("C"));
    assert_eq!(recoloured.colour("new"), 0);
}
