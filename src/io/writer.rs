use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Writer, WriterBuilder};
use log::info;

use super::open_input;
use crate::error::Result;
use crate::overlap::{OverlapRecord, OverlapRow};
use crate::testing::CorrelationResult;

pub const RESULT_COLUMNS: [&str; 6] = [
    "Enzyme",
    "Correlation",
    "t_value",
    "p_value",
    "conf_lower",
    "conf_upper",
];

pub const OVERLAP_COLUMNS: [&str; 11] = [
    "Enzyme",
    "Pearson_Correlation",
    "Pearson_t_value",
    "Pearson_p_value",
    "Pearson_conf_lower",
    "Pearson_conf_upper",
    "Spearman_Correlation",
    "Spearman_t_value",
    "Spearman_p_value",
    "Spearman_conf_lower",
    "Spearman_conf_upper",
];

// The header is written by hand so that empty tables still carry one.
fn tsv_writer(path: &Path, header: &[&str]) -> Result<Writer<File>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    Ok(writer)
}

/// Write a correlation result table with columns
/// `Enzyme, Correlation, t_value, p_value, conf_lower, conf_upper`.
pub fn write_results(path: &Path, results: &[CorrelationResult]) -> Result<()> {
    let mut writer = tsv_writer(path, &RESULT_COLUMNS)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;

    info!("Saved {} rows to {}", results.len(), path.display());
    Ok(())
}

/// Read a table previously written by [`write_results`].
pub fn read_results(path: &Path) -> Result<Vec<CorrelationResult>> {
    let file = open_input(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(file);

    let results = reader
        .deserialize::<CorrelationResult>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    info!("Read {} rows from {}", results.len(), path.display());
    Ok(results)
}

pub fn write_overlap(path: &Path, overlap: &[OverlapRecord]) -> Result<()> {
    let mut writer = tsv_writer(path, &OVERLAP_COLUMNS)?;
    for record in overlap {
        writer.serialize(OverlapRow::from(record))?;
    }
    writer.flush()?;

    info!("Saved {} overlapping enzymes to {}", overlap.len(), path.display());
    Ok(())
}
