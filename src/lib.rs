//! # enzyme-correlation
//!
//! Correlation analysis of enzyme abundances against a pollution-abundance profile.
//!
//! For every enzyme row of an abundance table this crate computes a Pearson or Spearman
//! correlation coefficient against the pollution vector, attaches a t-statistic, a two-tailed
//! p-value and a Fisher-z confidence interval, ranks the enzymes by coefficient and selects a
//! significant subset. Significant Pearson and Spearman sets can then be cross-referenced to
//! find enzymes that are significant under both methods.
//!
//! ## Core Features
//!
//! - **Correlation**: Pearson product-moment and Spearman rank coefficients
//! - **Significance**: Student's t p-values and Fisher-z confidence intervals
//! - **Filtering**: running-sum p-value cutoff, with Benjamini-Hochberg available on request
//! - **Reports**: tab-separated tables compatible with the usual `all_`/`sig_`/overlap layout
//!
//! ## Quick Start
//!
//! Load the inputs with [`io::load_pollution`] and [`io::load_enzymes`], then call
//! [`pipeline::analyze`] once per method and [`overlap::find_overlap`] on the two
//! significant sets. [`pipeline::run_all`] does all of this from an [`AnalysisConfig`].
//!
//! ## Module Organization
//!
//! - **[`correlation`]**: Correlation coefficients and rank transforms
//! - **[`testing`]**: Significance, ranking and filtering of coefficients
//! - **[`overlap`]**: Cross-referencing of significant sets
//! - **[`io`]**: TSV loading and report writing
//! - **[`pipeline`]**: Stage functions and file-level runs

pub mod config;
pub mod correlation;
pub mod error;
pub mod io;
pub mod overlap;
pub mod pipeline;
pub mod testing;

pub use config::{AnalysisConfig, ErrorPolicy};
pub use correlation::{CorrelationMethod, correlate};
pub use error::{AnalysisError, Result};
pub use testing::CorrelationResult;
