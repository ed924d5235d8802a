//! Pairwise distance table shared by filtering and annotation

use crate::error::PartitionError;
use anyhow::Result;
use std::collections::HashMap;

/// Read-only mapping from unordered node pairs to dissimilarity scores.
///
/// Pairs absent from the table read as infinite distance, so their edges
/// are always eligible for removal under any finite threshold. The table
/// is never mutated during filtering and can be shared across concurrent
/// operations on different graphs.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    distances: HashMap<(String, String), f64>,
}

/// Canonical key for an unordered node pair
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl DistanceTable {
    /// Create an empty distance table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the distance between a pair of nodes
    ///
    /// The pair is unordered: inserting (a, b) and looking up (b, a) is
    /// the same entry. Negative or non-finite distances are rejected.
    pub fn insert(&mut self, a: &str, b: &str, distance: f64) -> Result<()> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(PartitionError::InvalidDistance {
                first: a.to_string(),
                second: b.to_string(),
                distance,
            }
            .into());
        }
        self.distances.insert(pair_key(a, b), distance);
        Ok(())
    }

    /// Look up the distance between two nodes, if known
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.distances.get(&pair_key(a, b)).copied()
    }

    /// Look up the distance between two nodes, treating unknown pairs as infinite
    pub fn distance_or_infinite(&self, a: &str, b: &str) -> f64 {
        self.get(a, b).unwrap_or(f64::INFINITY)
    }

    /// Number of known pairs
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Reject distance thresholds that are negative or non-finite
pub fn validate_distance_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(PartitionError::InvalidDistanceThreshold(threshold).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_unordered() {
        let mut table = DistanceTable::new();
        table.insert("b", "a", 0.25).unwrap();

        assert_eq!(table.get("a", "b"), Some(0.25));
        assert_eq!(table.get("b", "a"), Some(0.25));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_pair_is_infinite() {
        let table = DistanceTable::new();
        assert_eq!(table.get("x", "y"), None);
        assert!(table.distance_or_infinite("x", "y").is_infinite());
    }

    #[test]
    fn test_negative_distance_rejected() {
        let mut table = DistanceTable::new();
        assert!(table.insert("a", "b", -0.1).is_err());
        assert!(table.insert("a", "b", f64::NAN).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_distance_threshold(0.0).is_ok());
        assert!(validate_distance_threshold(3.5).is_ok());
        assert!(validate_distance_threshold(-1.0).is_err());
        assert!(validate_distance_threshold(f64::INFINITY).is_err());
        assert!(validate_distance_threshold(f64::NAN).is_err());
    }
}
