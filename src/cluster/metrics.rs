//! Partition quality and edge centrality metrics

use crate::graph::{CommunityGraph, NodeSet};
use std::collections::{HashMap, VecDeque};

/// Modularity of a partition over a weighted graph
///
/// Compares within-partition edge weight against the random-graph
/// expectation for the same weighted degree sequence. A graph with no
/// edge weight scores 0, not undefined.
pub fn modularity(graph: &CommunityGraph, partition: &[NodeSet]) -> f64 {
    let mut node_to_community: HashMap<&str, usize> = HashMap::new();
    for (community, nodes) in partition.iter().enumerate() {
        for node in nodes {
            node_to_community.insert(node.as_str(), community);
        }
    }

    let mut total_weight = 0.0;
    let mut intra_weight = vec![0.0; partition.len()];
    let mut community_degree = vec![0.0; partition.len()];

    for (u, v, data) in graph.edges() {
        total_weight += data.weight;
        let (cu, cv) = match (node_to_community.get(u), node_to_community.get(v)) {
            (Some(&cu), Some(&cv)) => (cu, cv),
            _ => continue,
        };
        community_degree[cu] += data.weight;
        community_degree[cv] += data.weight;
        if cu == cv {
            intra_weight[cu] += data.weight;
        }
    }

    if total_weight <= 0.0 {
        return 0.0;
    }

    (0..partition.len())
        .map(|c| {
            let expected = community_degree[c] / (2.0 * total_weight);
            intra_weight[c] / total_weight - expected * expected
        })
        .sum()
}

/// Edge betweenness centrality for every edge of the graph
///
/// Brandes accumulation over breadth-first shortest paths, with each
/// undirected path counted once. Keys are lexicographically ordered
/// endpoint pairs.
pub fn edge_betweenness(graph: &CommunityGraph) -> HashMap<(String, String), f64> {
    let nodes: Vec<&str> = graph.nodes().collect();
    let n = nodes.len();
    let position: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let adjacency: Vec<Vec<usize>> = nodes
        .iter()
        .map(|&id| {
            graph
                .neighbors(id)
                .into_iter()
                .map(|neighbor| position[neighbor])
                .collect()
        })
        .collect();

    let mut scores: HashMap<(usize, usize), f64> = HashMap::new();

    for source in 0..n {
        let mut visit_order: Vec<usize> = Vec::new();
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut path_counts = vec![0.0_f64; n];
        let mut dist = vec![usize::MAX; n];

        path_counts[source] = 1.0;
        dist[source] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            visit_order.push(v);
            for &w in &adjacency[v] {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    path_counts[w] += path_counts[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut dependency = vec![0.0_f64; n];
        for &w in visit_order.iter().rev() {
            for &v in &predecessors[w] {
                let contribution = path_counts[v] / path_counts[w] * (1.0 + dependency[w]);
                let key = if v < w { (v, w) } else { (w, v) };
                *scores.entry(key).or_insert(0.0) += contribution;
                dependency[v] += contribution;
            }
        }
    }

    scores
        .into_iter()
        .map(|((a, b), score)| {
            let (u, v) = if nodes[a] <= nodes[b] {
                (nodes[a], nodes[b])
            } else {
                (nodes[b], nodes[a])
            };
            // each shortest path was counted from both of its endpoints
            ((u.to_string(), v.to_string()), score / 2.0)
        })
        .collect()
}
