//! Tab-separated input tables and report files.
//!
//! ```text
//!  pollution_abundance.tsv   enzyme_abundance.tsv
//!            │                       │
//!            ▼                       ▼
//!      ┌──────────┐            ┌──────────┐
//!      │  loader  │            │  loader  │   Vec<f64> / EnzymeTable
//!      └──────────┘            └──────────┘
//!                   (analysis)
//!                       │
//!                       ▼
//!                 ┌──────────┐
//!                 │  writer  │   all_/sig_ tables, enzyme_overlap.tsv
//!                 └──────────┘
//! ```

use crate::correlation::CorrelationMethod;
use crate::error::{AnalysisError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod loader;
pub mod writer;

pub use loader::{EnzymeTable, load_enzymes, load_pollution};
pub use writer::{read_results, write_overlap, write_results};

pub const DEFAULT_POLLUTION_FILE: &str = "pollution_abundance.tsv";
pub const DEFAULT_ENZYME_FILE: &str = "enzyme_abundance.tsv";
pub const OVERLAP_FILE: &str = "enzyme_overlap.tsv";

/// `all_enzyme_<method>_correlations.tsv` inside `dir`.
pub fn all_results_path(dir: &Path, method: CorrelationMethod) -> PathBuf {
    dir.join(format!("all_enzyme_{}_correlations.tsv", method))
}

/// `sig_<method>_enzymes.tsv` inside `dir`.
pub fn significant_path(dir: &Path, method: CorrelationMethod) -> PathBuf {
    dir.join(format!("sig_{}_enzymes.tsv", method))
}

pub fn overlap_path(dir: &Path) -> PathBuf {
    dir.join(OVERLAP_FILE)
}

/// Open an input file, reporting a missing path as [`AnalysisError::MissingFile`].
pub(crate) fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AnalysisError::MissingFile(path.to_path_buf()),
        _ => AnalysisError::Io(e),
    })
}
