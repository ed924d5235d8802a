//! Distance table loading from tabular files

use crate::graph::DistanceTable;
use anyhow::Result;
use polars::prelude::*;

/// Load a pairwise distance table from a tab-separated file
///
/// Expects columns `sequence_1`, `sequence_2` and `distance`. Pair order
/// in the file does not matter; duplicate pairs keep the last value.
pub fn load_distance_table(path: &str) -> Result<DistanceTable> {
    log::info!("Reading distance table: {}", path);

    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(b'\t')
        .finish()?
        .collect()?;

    log::info!("Loaded {} distance entries", df.height());

    let first = df.column("sequence_1")?.str()?;
    let second = df.column("sequence_2")?.str()?;
    let distance_col = df.column("distance")?.cast(&DataType::Float64)?;
    let distance = distance_col.f64()?;

    let mut table = DistanceTable::new();
    for i in 0..df.height() {
        let (Some(a), Some(b), Some(d)) = (first.get(i), second.get(i), distance.get(i)) else {
            continue;
        };
        table.insert(a, b, d)?;
    }

    log::info!("Distance table holds {} pairs", table.len());
    Ok(table)
}
