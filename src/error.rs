use std::path::PathBuf;

/// Everything that can abort a report build.
///
/// Every variant that originates from an input file carries its path so the
/// caller can tell the user which file failed which check.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("{}: table has no data rows", .0.display())]
    EmptyTable(PathBuf),

    #[error("{}: malformed table: {reason}", path.display())]
    MalformedTable { path: PathBuf, reason: String },

    #[error(
        "{}: measure columns {found:?} differ from the report's measure set {expected:?}",
        path.display()
    )]
    HeterogeneousMeasureSet {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{files} input files but only {styles} line styles configured")]
    InsufficientStyles { files: usize, styles: usize },

    #[error("{}: parameter column '{column}' is not constant", path.display())]
    VaryingParameter { path: PathBuf, column: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid line style '{0}'")]
    InvalidLineStyle(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReportError::MalformedTable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
