//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while selecting or compiling a line format
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Unknown log format: {0}")]
    UnknownFormat(String),

    #[error("Invalid line template {template:?}: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },

    #[error("Line template {template:?} does not capture the {field} field")]
    MissingField { field: &'static str, template: String },

    #[error("Unable to guess log format - please specify (first line: {sample:?})")]
    Unrecognized { sample: String },
}

/// Errors that can occur while reading the input log
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Error opening file {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error decompressing file {path}: {reason}")]
    DecompressFailed { path: PathBuf, reason: String },

    #[error("Error reading log: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
