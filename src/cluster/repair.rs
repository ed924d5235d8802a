//! Deterministic repair of undersized subcommunities
//!
//! A single ascending-size pass: each subcommunity at or below the size
//! threshold is merged into the largest subcommunity adjacent to it,
//! provided that candidate is at least as large as itself. The pass does
//! not iterate to a fixed point; a subcommunity visited and left unmerged
//! is not reconsidered even if a later merge would have made it mergeable.
//! Changing this would change observable output, so it stays single-pass.

use crate::graph::{CommunityGraph, NodeSet};
use std::collections::{BTreeSet, HashMap};

/// Merge undersized subcommunities into adjacent larger ones
///
/// Input and output cover the same nodes; absorbed subcommunities are
/// dropped from the result. Ties between equally-largest candidates go to
/// the lowest index in the size-sorted ordering.
pub fn merge_small_subcommunities(
    graph: &CommunityGraph,
    subcommunities: Vec<NodeSet>,
    size_threshold: usize,
) -> Vec<NodeSet> {
    let mut subcommunities = subcommunities;
    // smaller subcommunities must be evaluated before the ones that may
    // absorb them; the sort is stable, keeping equal sizes in input order
    subcommunities.sort_by_key(|nodes| nodes.len());

    // resolved once over the sorted ordering; merges do not refresh it
    let node_to_subcommunity = node_to_subcommunity(&subcommunities);

    for idx in 0..subcommunities.len() {
        let size = subcommunities[idx].len();
        if size == 0 || size > size_threshold {
            continue;
        }

        let boundary: NodeSet = subcommunities[idx]
            .iter()
            .flat_map(|node| graph.neighbors(node))
            .filter(|neighbor| !subcommunities[idx].contains(*neighbor))
            .map(|neighbor| neighbor.to_string())
            .collect();
        if boundary.is_empty() {
            // isolated: nothing to merge into
            continue;
        }

        let candidates: BTreeSet<usize> = boundary
            .iter()
            .filter_map(|neighbor| node_to_subcommunity.get(neighbor.as_str()).copied())
            .collect();
        let largest = candidates
            .iter()
            .map(|&candidate| subcommunities[candidate].len())
            .max()
            .unwrap_or(0);
        if largest < size {
            // merging into a smaller subcommunity would not fix undersizing
            continue;
        }

        let target = candidates
            .iter()
            .copied()
            .find(|&candidate| subcommunities[candidate].len() == largest);
        if let Some(target) = target {
            let absorbed = std::mem::take(&mut subcommunities[idx]);
            subcommunities[target].extend(absorbed);
        }
    }

    subcommunities.retain(|nodes| !nodes.is_empty());
    subcommunities
}

/// Ephemeral node membership index over the sorted subcommunity list
fn node_to_subcommunity(subcommunities: &[NodeSet]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (subcommunity, nodes) in subcommunities.iter().enumerate() {
        for node in nodes {
            index.insert(node.clone(), subcommunity);
        }
    }
    index
}
