//! Partition persistence module

use crate::graph::{CommunityGraph, NodeSet};
use anyhow::Result;
use itertools::Itertools;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Save the ordered partition list as a binary snapshot
pub fn save_snapshot(partitions: &[NodeSet], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, partitions)?;
    writer.flush()?;
    Ok(())
}

/// Reconstruct the ordered partition list from a binary snapshot
///
/// The round-trip reproduces the identical ordered sequence of identical
/// node sets.
pub fn load_snapshot(path: &Path) -> Result<Vec<NodeSet>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let partitions = bincode::deserialize_from(reader)?;
    Ok(partitions)
}

/// Save the partitions as plain text, one partition per line
///
/// Node identifiers are space-separated in sorted order, so the file is
/// identical across runs for identical partitions.
pub fn save_text(partitions: &[NodeSet], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for partition in partitions {
        writeln!(writer, "{}", partition.iter().join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Save summary statistics about the subcommunities
fn save_summary(subcommunities: &[CommunityGraph], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;

    let sizes: Vec<usize> = subcommunities.iter().map(|s| s.node_count()).collect();
    let summary = serde_json::json!({
        "subcommunity_count": subcommunities.len(),
        "total_nodes": sizes.iter().sum::<usize>(),
        "largest_subcommunity_size": sizes.iter().max().copied().unwrap_or(0),
        "smallest_subcommunity_size": sizes.iter().min().copied().unwrap_or(0),
        "subcommunities": subcommunities.iter().map(|s| {
            serde_json::json!({
                "label": s.label(),
                "size": s.node_count(),
                "edges": s.edge_count(),
                "colour": s.colour_index(),
            })
        }).collect::<Vec<_>>(),
    });

    file.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;
    Ok(())
}

/// Save all partitioning results to the output directory
pub fn save_results(subcommunities: &[CommunityGraph], output_dir: &str) -> Result<()> {
    log::info!(
        "Saving {} subcommunities to {}",
        subcommunities.len(),
        output_dir
    );

    fs::create_dir_all(output_dir)?;
    let dir = Path::new(output_dir);

    let partitions: Vec<NodeSet> = subcommunities.iter().map(|s| s.node_set()).collect();
    save_snapshot(&partitions, &dir.join("subcommunities.bin"))?;
    save_text(&partitions, &dir.join("subcommunities.txt"))?;
    save_summary(subcommunities, &dir.join("summary.json"))?;

    log::info!("Results saved successfully");
    Ok(())
}
