use linkage_core::DataSourceError;
use thiserror::Error;

/// Errors raised while reading a point file.
///
/// Line numbers are one-based and count blank lines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PointsProviderError {
    #[error("input has no header line declaring the item count")]
    MissingHeader,
    #[error("line {line}: invalid item count `{value}`")]
    InvalidCount { line: usize, value: String },
    #[error("header declares no items")]
    EmptyInput,
    #[error("line {line}: missing `|` between label and coordinates")]
    MissingSeparator { line: usize },
    #[error("line {line}: label is empty")]
    EmptyLabel { line: usize },
    #[error("line {line}: record has no coordinates")]
    MissingCoordinates { line: usize },
    #[error("line {line}: invalid coordinate `{value}`")]
    InvalidCoordinate { line: usize, value: String },
    #[error("line {line}: expected {expected} coordinates but found {actual}")]
    InconsistentDimension {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("header declares {declared} items but {found} records were read")]
    CountMismatch { declared: usize, found: usize },
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
