//! Error types for the climate crate.

use thiserror::Error;

/// Result type alias for climate operations.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Errors that can occur while reading the climate dataset.
///
/// An empty result set is never an error; queries that match nothing return
/// empty collections or null aggregates.
#[derive(Error, Debug, Clone)]
pub enum ClimateError {
    /// The dataset could not be opened or is missing required tables.
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    /// A query against a reachable data source failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The dataset holds no measurements to derive a default from.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// A stored date could not be interpreted as `yyyy-mm-dd`.
    #[error("Invalid date '{date}': {message}")]
    InvalidDate { date: String, message: String },
}

impl ClimateError {
    /// Short machine-readable category, used in API error bodies.
    pub fn category(&self) -> &'static str {
        match self {
            ClimateError::DataSourceUnavailable(_) => "data_source_unavailable",
            ClimateError::QueryFailed(_) => "query_failed",
            ClimateError::EmptyDataset(_) => "empty_dataset",
            ClimateError::InvalidDate { .. } => "invalid_date",
        }
    }
}
