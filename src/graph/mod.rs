//! Graph representation and distance filtering module

pub mod community;
pub mod distance;

use std::collections::BTreeSet;

/// A set of node identifiers, ordered so that output is reproducible
pub type NodeSet = BTreeSet<String>;

pub use community::{CommunityGraph, EdgeData};
pub use distance::DistanceTable;
