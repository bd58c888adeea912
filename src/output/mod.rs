//! Report writers.
//!
//! This module handles rendering the ranked routes:
//! - Plain-text top-N sections for stdout
//! - JSON reports on disk

pub mod json;
pub mod schema;
pub mod text;

// Re-export main functions
pub use json::{build_report, read_report, write_report};
pub use schema::{ReportSection, RouteReport};
pub use text::{render_report, render_section};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
