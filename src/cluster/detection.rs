//! Community detection strategies
//!
//! Both strategies satisfy the same contract: an ordered sequence of
//! disjoint node sets covering every node of the graph exactly once.
//! Label propagation is cheap and adequate for well-separated clusters;
//! the hierarchical modularity search costs more but copes with graphs
//! where propagation under- or over-merges structure.

use crate::cluster::metrics::{edge_betweenness, modularity};
use crate::graph::{CommunityGraph, NodeSet};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Fixed seed keeping label propagation reproducible across runs
const PROPAGATION_SEED: u64 = 42;

/// A strategy proposing an initial partition of a graph's nodes
pub trait CommunityDetection {
    /// Partition the graph into disjoint node sets covering all nodes
    fn detect(&self, graph: &CommunityGraph) -> Result<Vec<NodeSet>>;
}

/// Randomized weighted label propagation with a fixed internal seed.
///
/// Every node starts with its own label and repeatedly adopts the label
/// carrying the highest total edge weight among its neighbors, until all
/// labels are stable or the iteration bound is hit.
#[derive(Debug, Clone)]
pub struct LabelPropagation {
    max_iter: usize,
}

impl LabelPropagation {
    /// Create a detector with the default iteration bound
    pub fn new() -> Self {
        Self { max_iter: 100 }
    }

    /// Set the iteration bound
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

impl Default for LabelPropagation {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for LabelPropagation {
    fn detect(&self, graph: &CommunityGraph) -> Result<Vec<NodeSet>> {
        let nodes: Vec<&str> = graph.nodes().collect();
        let n = nodes.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let position: HashMap<&str, usize> =
            nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut labels: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(PROPAGATION_SEED);
        let mut order: Vec<usize> = (0..n).collect();

        for _ in 0..self.max_iter {
            let mut changed = false;
            order.shuffle(&mut rng);

            for &node in &order {
                let mut label_weights: HashMap<usize, f64> = HashMap::new();
                for (neighbor, weight) in graph.neighbor_weights(nodes[node]) {
                    *label_weights.entry(labels[position[neighbor]]).or_insert(0.0) += weight;
                }
                if label_weights.is_empty() {
                    continue;
                }

                let heaviest = label_weights
                    .values()
                    .fold(f64::NEG_INFINITY, |acc, &w| acc.max(w));
                let mut candidates: Vec<usize> = label_weights
                    .iter()
                    .filter(|(_, &w)| w == heaviest)
                    .map(|(&label, _)| label)
                    .collect();
                // map iteration order is not reproducible
                candidates.sort_unstable();

                if candidates.contains(&labels[node]) {
                    continue;
                }
                labels[node] = candidates[rng.gen_range(0..candidates.len())];
                changed = true;
            }

            if !changed {
                break;
            }
        }

        Ok(group_by_label(&nodes, &labels))
    }
}

/// Group nodes sharing a label, ordered by first node appearance
fn group_by_label(nodes: &[&str], labels: &[usize]) -> Vec<NodeSet> {
    let mut groups: Vec<NodeSet> = Vec::new();
    let mut label_to_group: HashMap<usize, usize> = HashMap::new();
    for (i, &node) in nodes.iter().enumerate() {
        let group = *label_to_group.entry(labels[i]).or_insert_with(|| {
            groups.push(NodeSet::new());
            groups.len() - 1
        });
        groups[group].insert(node.to_string());
    }
    groups
}

/// Edge valuation used to pick the next edge to remove
pub type EdgeScorer = Box<dyn Fn(&CommunityGraph) -> HashMap<(String, String), f64>>;

/// Hierarchical modularity search over a dendrogram of partitions.
///
/// Iteratively removes the edge with the highest betweenness centrality
/// (or an externally supplied edge valuation), scoring each level of the
/// resulting dendrogram by modularity and returning the best-scoring
/// level. The search is seeded with the whole graph's connected-components
/// partition so nodes without edges survive as singletons.
#[derive(Default)]
pub struct GirvanNewman {
    edge_scorer: Option<EdgeScorer>,
}

impl GirvanNewman {
    /// Create a search using edge betweenness centrality
    pub fn new() -> Self {
        Self { edge_scorer: None }
    }

    /// Replace the edge valuation function
    ///
    /// Scores must be keyed by lexicographically ordered endpoint pairs.
    pub fn with_edge_scorer(mut self, scorer: EdgeScorer) -> Self {
        self.edge_scorer = Some(scorer);
        self
    }

    fn score_edges(&self, graph: &CommunityGraph) -> HashMap<(String, String), f64> {
        match &self.edge_scorer {
            Some(scorer) => scorer(graph),
            None => edge_betweenness(graph),
        }
    }
}

impl CommunityDetection for GirvanNewman {
    fn detect(&self, graph: &CommunityGraph) -> Result<Vec<NodeSet>> {
        if graph.node_count() == 0 {
            return Ok(Vec::new());
        }
        if graph.node_count() == 1 {
            return Ok(vec![graph.node_set()]);
        }

        let mut best = graph.components();
        let mut best_score = level_modularity(graph, &best);

        let mut work = graph.clone();
        while work.edge_count() > 0 {
            let scores = self.score_edges(&work);
            let Some((u, v)) = highest_scoring_edge(&work, &scores) else {
                break;
            };
            work.remove_edge(&u, &v);

            let level = work.components();
            let score = level_modularity(&work, &level);
            if score > best_score {
                best_score = score;
                best = level;
            }
        }

        log::debug!(
            "{}: best dendrogram level has {} partitions at modularity {:.4}",
            graph.label(),
            best.len(),
            best_score
        );
        Ok(best)
    }
}

/// Modularity of a dendrogram level, restricted to non-isolated nodes
///
/// A level whose induced subgraph has no edges scores 0, not undefined.
fn level_modularity(work: &CommunityGraph, partition: &[NodeSet]) -> f64 {
    let active: NodeSet = work
        .nodes()
        .filter(|node| work.degree(node) > 0)
        .map(|node| node.to_string())
        .collect();
    if active.is_empty() {
        return 0.0;
    }

    let subgraph = work.induced_subgraph(&active);
    let restricted: Vec<NodeSet> = partition
        .iter()
        .map(|nodes| nodes.intersection(&active).cloned().collect::<NodeSet>())
        .filter(|nodes| !nodes.is_empty())
        .collect();
    modularity(&subgraph, &restricted)
}

/// Pick the edge with the strictly greatest score, first match winning ties
fn highest_scoring_edge(
    graph: &CommunityGraph,
    scores: &HashMap<(String, String), f64>,
) -> Option<(String, String)> {
    let mut best: Option<(String, String)> = None;
    let mut best_score = f64::NEG_INFINITY;

    for (u, v, _) in graph.edges() {
        let key = if u <= v {
            (u.to_string(), v.to_string())
        } else {
            (v.to_string(), u.to_string())
        };
        let score = scores.get(&key).copied().unwrap_or(0.0);
        if score > best_score {
            best_score = score;
            best = Some((u.to_string(), v.to_string()));
        }
    }

    best
}
