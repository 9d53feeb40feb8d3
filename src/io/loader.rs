use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use ndarray::{Array2, ArrayView1, Axis};

use super::open_input;
use crate::error::{AnalysisError, Result};

/// Name of the pollution column holding the per-sample abundance.
pub const ABUNDANCE_COLUMN: &str = "abundance";

/// Metadata lines preceding the header row of an enzyme table.
pub const DEFAULT_METADATA_LINES: usize = 2;

/// Enzyme abundance table: one row per enzyme, one column per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EnzymeTable {
    names: Vec<String>,
    abundances: Array2<f64>,
}

impl EnzymeTable {
    pub fn new(names: Vec<String>, abundances: Array2<f64>) -> Result<Self> {
        if names.len() != abundances.nrows() {
            return Err(AnalysisError::InvalidParameter(format!(
                "{} enzyme names for {} abundance rows",
                names.len(),
                abundances.nrows()
            )));
        }
        Ok(EnzymeTable { names, abundances })
    }

    /// Build a table from `(name, values)` records that must all have the same length.
    pub fn from_records<S>(records: Vec<(S, Vec<f64>)>) -> Result<Self>
    where
        S: Into<String>,
    {
        let n_samples = records.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(records.len());
        let mut flat = Vec::with_capacity(records.len() * n_samples);

        for (name, values) in records {
            let name = name.into();
            if values.len() != n_samples {
                return Err(AnalysisError::ShapeMismatch {
                    enzyme: name,
                    expected: n_samples,
                    found: values.len(),
                });
            }
            names.push(name);
            flat.extend(values);
        }

        let abundances = Array2::from_shape_vec((names.len(), n_samples), flat)?;
        Ok(EnzymeTable { names, abundances })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn n_samples(&self) -> usize {
        self.abundances.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn abundances(&self) -> &Array2<f64> {
        &self.abundances
    }

    pub fn record(&self, index: usize) -> Option<(&str, ArrayView1<'_, f64>)> {
        let name = self.names.get(index)?;
        Some((name.as_str(), self.abundances.row(index)))
    }

    /// Iterate over `(name, abundance row)` pairs in input order.
    pub fn records(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.abundances.axis_iter(Axis(0)))
    }
}

/// Load the pollution abundance vector from the `abundance` column of a TSV file.
pub fn load_pollution(path: &Path) -> Result<Vec<f64>> {
    let file = open_input(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(file);

    let idx = reader
        .headers()?
        .iter()
        .position(|h| h == ABUNDANCE_COLUMN)
        .ok_or_else(|| AnalysisError::MissingColumn {
            column: ABUNDANCE_COLUMN.to_string(),
            path: path.to_path_buf(),
        })?;

    let mut values = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = record.get(idx).unwrap_or("");
        values.push(parse_value(field, line_of(&record, 0), path)?);
    }

    info!("Loaded {} pollution samples from {}", values.len(), path.display());
    Ok(values)
}

/// Load an enzyme abundance table.
///
/// The first `metadata_lines` lines are skipped, the next line is the column header
/// (enzyme column followed by sample identifiers), and every remaining row is
/// `name \t v1 ... vN`. Each row must carry exactly as many values as the header names
/// samples; otherwise [`AnalysisError::ShapeMismatch`] is returned.
pub fn load_enzymes(path: &Path, metadata_lines: usize) -> Result<EnzymeTable> {
    let mut input = BufReader::new(open_input(path)?);
    skip_lines(&mut input, metadata_lines)?;
    let table = parse_enzyme_rows(input, metadata_lines, path)?;

    info!(
        "Loaded {} enzymes x {} samples from {}",
        table.len(),
        table.n_samples(),
        path.display()
    );
    Ok(table)
}

/// Like [`load_enzymes`], additionally requiring `expected_samples` columns.
pub fn load_enzymes_checked(
    path: &Path,
    metadata_lines: usize,
    expected_samples: usize,
) -> Result<EnzymeTable> {
    let table = load_enzymes(path, metadata_lines)?;
    if !table.is_empty() && table.n_samples() != expected_samples {
        return Err(AnalysisError::ShapeMismatch {
            enzyme: table.names[0].clone(),
            expected: expected_samples,
            found: table.n_samples(),
        });
    }
    Ok(table)
}

fn skip_lines<R: BufRead>(input: &mut R, count: usize) -> Result<()> {
    let mut buf = Vec::new();
    for _ in 0..count {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
    }
    Ok(())
}

fn parse_enzyme_rows<R: Read>(input: R, line_offset: usize, path: &Path) -> Result<EnzymeTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let n_samples = reader.headers()?.len().saturating_sub(1);
    debug!("Enzyme header declares {} samples", n_samples);

    let mut names = Vec::new();
    let mut flat = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record, line_offset);

        let name = record.get(0).unwrap_or("").to_string();
        let found = record.len().saturating_sub(1);
        if found != n_samples {
            return Err(AnalysisError::ShapeMismatch {
                enzyme: name,
                expected: n_samples,
                found,
            });
        }

        for field in record.iter().skip(1) {
            flat.push(parse_value(field, line, path)?);
        }
        names.push(name);
    }

    let abundances = Array2::from_shape_vec((names.len(), n_samples), flat)?;
    EnzymeTable::new(names, abundances)
}

fn parse_value(field: &str, line: u64, path: &Path) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| AnalysisError::InvalidValue {
            value: field.to_string(),
            line,
            path: path.to_path_buf(),
        })
}

fn line_of(record: &StringRecord, offset: usize) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0) + offset as u64
}
