//! Run configuration.
//!
//! Every field has a default matching the conventional file layout, so an empty TOML file
//! (or no file at all) is a valid configuration:
//!
//! ```toml
//! pollution_file = "pollution_abundance.tsv"
//! enzyme_file = "enzyme_abundance.tsv"
//! output_dir = "."
//! method = "spearman"
//! confidence_level = 0.95
//! metadata_lines = 2
//! error_policy = "abort"      # or "skip"
//! filter = "cumulative"       # or "benjamini-hochberg"
//! alpha = 0.05                # benjamini-hochberg only
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::correlation::CorrelationMethod;
use crate::error::{AnalysisError, Result};
use crate::io::loader::DEFAULT_METADATA_LINES;
use crate::io::{DEFAULT_ENZYME_FILE, DEFAULT_POLLUTION_FILE};
use crate::testing::correction::FilterRule;
use crate::testing::significance::DEFAULT_CONFIDENCE_LEVEL;

/// What to do when a single enzyme record cannot be analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort the whole run on the first failing record
    #[default]
    Abort,
    /// Log a warning, record the enzyme as skipped and continue
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    Cumulative,
    BenjaminiHochberg,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub pollution_file: PathBuf,
    pub enzyme_file: PathBuf,
    pub output_dir: PathBuf,
    /// Method used by single-method runs
    pub method: CorrelationMethod,
    pub confidence_level: f64,
    pub metadata_lines: usize,
    pub error_policy: ErrorPolicy,
    pub filter: FilterKind,
    pub alpha: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pollution_file: PathBuf::from(DEFAULT_POLLUTION_FILE),
            enzyme_file: PathBuf::from(DEFAULT_ENZYME_FILE),
            output_dir: PathBuf::from("."),
            method: CorrelationMethod::Spearman,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            metadata_lines: DEFAULT_METADATA_LINES,
            error_policy: ErrorPolicy::Abort,
            filter: FilterKind::Cumulative,
            alpha: 0.05,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file; absent keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AnalysisError::MissingFile(path.to_path_buf()),
            _ => AnalysisError::Io(e),
        })?;
        Self::from_toml_str(&content).map_err(|message| AnalysisError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        let config: AnalysisConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "confidence_level must lie in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if self.filter == FilterKind::BenjaminiHochberg && !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "alpha must lie in (0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    pub fn filter_rule(&self) -> FilterRule {
        match self.filter {
            FilterKind::Cumulative => FilterRule::CumulativePValue,
            FilterKind::BenjaminiHochberg => FilterRule::BenjaminiHochberg { alpha: self.alpha },
        }
    }
}
