use std::io;

use thiserror::Error;

/// Convenience alias used by the loader, geo and boundary-parsing code.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Error type for dataset loading, boundary loading and filter input validation.
///
/// Filtering and aggregation themselves never fail: an empty view is a valid
/// result. Everything here is raised at the boundary, before the core runs.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed CSV on line {line}: {message}")]
    Csv { line: usize, message: String },
    #[error("required column '{0}' is missing from the recipe table")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("recipe source is empty")]
    EmptySource,
    #[error("unsupported recipe file format: {0}")]
    UnsupportedFormat(String),
    #[error("excel error: {0}")]
    Excel(String),
    #[error("invalid geojson: {0}")]
    GeoJson(String),
    #[error("invalid rank bucket '{0}', expected '<start>-<end>'")]
    InvalidRankBucket(String),
    #[error("invalid time bucket '{0}'")]
    InvalidTimeBucket(String),
}
