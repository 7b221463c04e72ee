//! Error types for the simstudy pipeline.
//!
//! Errors are split by concern so that structural failures (unreadable files,
//! missing columns, unparseable values) carry the file and position that
//! caused them. Per-row anomalies such as sampling shortfalls or unresolved
//! duplicates are not errors; they are collected into run reports.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for simstudy operations.
#[derive(Error, Debug)]
pub enum StudyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input or output table errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tabular input/output errors.
///
/// All of these abort the run: the pipeline does not try to recover from
/// structurally invalid tables.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The file could not be opened or created
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record could not be read (ragged row, bad encoding, ...)
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A cell could not be parsed into the expected type
    #[error("Invalid value '{value}' for column '{column}' in {path} (line {line})")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// Writing an output table failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Convenience type alias for simstudy results.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Convenience type alias for dataset-specific results.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
