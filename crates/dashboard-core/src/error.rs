use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::YearMonth;

/// Failures while reading and normalizing the incident file.
///
/// Fatal for the session: the caller reports them and stops.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text is structurally broken.
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// None of the accepted header spellings for a required column exist.
    #[error("Required column {column} not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// Two headers normalize to the same name and the loader reads that name.
    #[error("Column {column} appears more than once in {path} after normalization")]
    DuplicateColumn { path: PathBuf, column: String },

    /// Every row had an unparsable occurrence timestamp (or there were none).
    #[error("No rows with a valid occurrence timestamp in {path} ({raw_rows} rows read)")]
    NoValidRows { path: PathBuf, raw_rows: usize },
}

/// A period selection that cannot be satisfied by the loaded dataset.
///
/// Recoverable: the caller picks another period.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPeriodError {
    /// There is no data to select a period from.
    #[error("Dataset is empty; no period can be selected")]
    EmptyDataset,

    /// The anchor date lies outside the dataset's date range.
    #[error("Date {anchor} is outside the available range {min} to {max}")]
    AnchorOutOfRange {
        anchor: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    /// The requested month has no incidents in the dataset.
    #[error("Month {0} is not present in the dataset")]
    UnknownMonth(YearMonth),

    /// The month token is not of the form `YYYY-MM`.
    #[error("Invalid month token: {0}")]
    MalformedMonth(String),
}

/// All errors produced by the crime dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    InvalidPeriod(#[from] InvalidPeriodError),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
