//! Analysis stages with typed inputs and outputs.
//!
//! ```text
//!  pollution + EnzymeTable ─► correlate_all ─► assess ─► rank_descending ─► FilterRule
//!                                                                              │
//!                                   MethodReport { all, significant } ◄────────┘
//! ```
//!
//! [`run_method`], [`run_all`] and [`run_overlap`] wrap these stages with file loading and
//! report writing.

use std::borrow::Cow;
use std::fs;

use log::{debug, info, warn};
use ndarray::{ArrayView1, Axis};
use rayon::prelude::*;

use crate::config::{AnalysisConfig, ErrorPolicy};
use crate::correlation::{CorrelationMethod, correlate};
use crate::error::{AnalysisError, Result};
use crate::io::loader::{EnzymeTable, load_enzymes, load_enzymes_checked, load_pollution};
use crate::io::{
    all_results_path, overlap_path, read_results, significant_path, write_overlap, write_results,
};
use crate::overlap::{OverlapRecord, find_overlap};
use crate::testing::correction::{FilterRule, rank_descending};
use crate::testing::significance::{DEFAULT_CONFIDENCE_LEVEL, SignificanceCalculator};
use crate::testing::{CorrelationResult, CorrelationScore};

/// Parameters of one single-method analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub method: CorrelationMethod,
    pub confidence_level: f64,
    pub filter: FilterRule,
    pub error_policy: ErrorPolicy,
}

impl AnalysisOptions {
    pub fn new(method: CorrelationMethod) -> Self {
        AnalysisOptions {
            method,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            filter: FilterRule::default(),
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn from_config(config: &AnalysisConfig, method: CorrelationMethod) -> Self {
        AnalysisOptions {
            method,
            confidence_level: config.confidence_level,
            filter: config.filter_rule(),
            error_policy: config.error_policy,
        }
    }
}

/// Records that made it through a stage, plus the enzymes skipped under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcomes<T> {
    pub records: Vec<T>,
    pub skipped: Vec<String>,
}

/// Output of [`analyze`] for one correlation method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub method: CorrelationMethod,
    /// Every result, sorted by coefficient descending
    pub all: Vec<CorrelationResult>,
    /// The significant subset selected by the filter rule, in the same order
    pub significant: Vec<CorrelationResult>,
    pub skipped: Vec<String>,
}

/// Both single-method reports and their overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub pearson: MethodReport,
    pub spearman: MethodReport,
    pub overlap: Vec<OverlapRecord>,
}

/// Correlate every enzyme row against the pollution vector.
///
/// Rows are processed in parallel; the returned scores keep the input order.
pub fn correlate_all(
    pollution: &[f64],
    enzymes: &EnzymeTable,
    method: CorrelationMethod,
    policy: ErrorPolicy,
) -> Result<RecordOutcomes<CorrelationScore>> {
    let outcomes: Vec<(String, Result<CorrelationScore>)> = enzymes
        .names()
        .par_iter()
        .zip(enzymes.abundances().axis_iter(Axis(0)).into_par_iter())
        .map(|(name, row)| {
            let score = correlate_row(pollution, row, method)
                .map(|r| CorrelationScore::new(name.clone(), r))
                .map_err(|e| with_enzyme(e, name));
            (name.clone(), score)
        })
        .collect();

    debug!("Computed {} {} coefficients", outcomes.len(), method);
    collect_outcomes(outcomes, policy)
}

fn correlate_row(
    pollution: &[f64],
    row: ArrayView1<'_, f64>,
    method: CorrelationMethod,
) -> Result<f64> {
    let values = match row.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(row.to_vec()),
    };
    correlate(pollution, &values[..], method)
}

fn with_enzyme(err: AnalysisError, name: &str) -> AnalysisError {
    match err {
        AnalysisError::ShapeMismatch { expected, found, .. } => AnalysisError::ShapeMismatch {
            enzyme: name.to_string(),
            expected,
            found,
        },
        AnalysisError::DegenerateInput(message) => {
            AnalysisError::DegenerateInput(format!("{}: {}", name, message))
        }
        other => other,
    }
}

fn collect_outcomes<T>(
    outcomes: Vec<(String, Result<T>)>,
    policy: ErrorPolicy,
) -> Result<RecordOutcomes<T>> {
    let mut records = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();

    for (name, outcome) in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err(e) => match policy {
                ErrorPolicy::Abort => return Err(e),
                ErrorPolicy::Skip => {
                    warn!("Skipping enzyme '{}': {}", name, e);
                    skipped.push(name);
                }
            },
        }
    }

    Ok(RecordOutcomes { records, skipped })
}

/// Attach t-statistic, p-value and confidence interval to every score.
pub fn assess(
    scores: Vec<CorrelationScore>,
    n_samples: usize,
    confidence_level: f64,
    policy: ErrorPolicy,
) -> Result<RecordOutcomes<CorrelationResult>> {
    let calculator = SignificanceCalculator::new(n_samples, confidence_level)?;

    let outcomes = scores
        .into_iter()
        .map(|score| {
            let name = score.enzyme.clone();
            let result = calculator
                .assess(score.correlation)
                .map(|significance| CorrelationResult::new(score, significance))
                .map_err(|e| with_enzyme(e, &name));
            (name, result)
        })
        .collect();

    collect_outcomes(outcomes, policy)
}

/// Run correlation, significance, ranking and filtering for one method.
pub fn analyze(
    pollution: &[f64],
    enzymes: &EnzymeTable,
    options: &AnalysisOptions,
) -> Result<MethodReport> {
    let scored = correlate_all(pollution, enzymes, options.method, options.error_policy)?;
    let assessed = assess(
        scored.records,
        pollution.len(),
        options.confidence_level,
        options.error_policy,
    )?;

    let mut all = assessed.records;
    rank_descending(&mut all);
    let significant = options.filter.apply(&all)?;

    let mut skipped = scored.skipped;
    skipped.extend(assessed.skipped);

    info!(
        "{} analysis: {} enzymes tested, {} significant, {} skipped",
        options.method.label(),
        all.len(),
        significant.len(),
        skipped.len()
    );

    Ok(MethodReport {
        method: options.method,
        all,
        significant,
        skipped,
    })
}

fn load_inputs(config: &AnalysisConfig) -> Result<(Vec<f64>, EnzymeTable)> {
    let pollution = load_pollution(&config.pollution_file)?;
    let enzymes = match config.error_policy {
        ErrorPolicy::Abort => {
            load_enzymes_checked(&config.enzyme_file, config.metadata_lines, pollution.len())?
        }
        ErrorPolicy::Skip => load_enzymes(&config.enzyme_file, config.metadata_lines)?,
    };
    Ok((pollution, enzymes))
}

fn write_report(config: &AnalysisConfig, report: &MethodReport) -> Result<()> {
    fs::create_dir_all(&config.output_dir)?;
    write_results(&all_results_path(&config.output_dir, report.method), &report.all)?;
    write_results(
        &significant_path(&config.output_dir, report.method),
        &report.significant,
    )?;
    Ok(())
}

/// Load the configured inputs, analyse them with `method` and write the
/// `all_enzyme_<method>_correlations.tsv` and `sig_<method>_enzymes.tsv` reports.
pub fn run_method(config: &AnalysisConfig, method: CorrelationMethod) -> Result<MethodReport> {
    config.validate()?;
    let (pollution, enzymes) = load_inputs(config)?;

    let report = analyze(&pollution, &enzymes, &AnalysisOptions::from_config(config, method))?;
    write_report(config, &report)?;
    Ok(report)
}

/// Analyse with both methods in one pass and cross-reference the in-memory significant sets.
pub fn run_all(config: &AnalysisConfig) -> Result<RunSummary> {
    config.validate()?;
    let (pollution, enzymes) = load_inputs(config)?;

    let pearson = analyze(
        &pollution,
        &enzymes,
        &AnalysisOptions::from_config(config, CorrelationMethod::Pearson),
    )?;
    write_report(config, &pearson)?;

    let spearman = analyze(
        &pollution,
        &enzymes,
        &AnalysisOptions::from_config(config, CorrelationMethod::Spearman),
    )?;
    write_report(config, &spearman)?;

    let overlap = find_overlap(&pearson.significant, &spearman.significant);
    write_overlap(&overlap_path(&config.output_dir), &overlap)?;

    Ok(RunSummary {
        pearson,
        spearman,
        overlap,
    })
}

/// Cross-reference significant tables written by earlier [`run_method`] invocations.
pub fn run_overlap(config: &AnalysisConfig) -> Result<Vec<OverlapRecord>> {
    let pearson = read_results(&significant_path(&config.output_dir, CorrelationMethod::Pearson))?;
    let spearman = read_results(&significant_path(&config.output_dir, CorrelationMethod::Spearman))?;

    let overlap = find_overlap(&pearson, &spearman);
    fs::create_dir_all(&config.output_dir)?;
    write_overlap(&overlap_path(&config.output_dir), &overlap)?;
    Ok(overlap)
}
