//! Subcommunity partitioning module

pub mod detection;
pub mod metrics;
pub mod partitioner;
pub mod repair;

pub use detection::{CommunityDetection, GirvanNewman, LabelPropagation};
pub use partitioner::{NodeColours, Partitioner};
pub use repair::merge_small_subcommunities;
