use std::path::PathBuf;

/// Errors raised while loading abundance tables, computing correlations or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Method must be either 'pearson' or 'spearman', got '{0}'")]
    InvalidMethod(String),

    #[error("Shape mismatch for '{enzyme}': expected {expected} samples, found {found}")]
    ShapeMismatch {
        enzyme: String,
        expected: usize,
        found: usize,
    },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Missing column '{column}' in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Invalid value '{value}' on line {line} of {}", .path.display())]
    InvalidValue {
        value: String,
        line: u64,
        path: PathBuf,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl AnalysisError {
    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        AnalysisError::DegenerateInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
