//! JSON report writer.
//!
//! Builds a [`RouteReport`] from an analysis and writes it with proper
//! formatting.

use super::schema::{ReportSection, RouteReport};
use crate::aggregator::{rank_rows, Analysis, Metric};
use crate::utils::config::{AnalyzerConfig, REPORT_VERSION};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Assemble the report for one analyzed log
pub fn build_report(analysis: &Analysis, source: &str, config: &AnalyzerConfig) -> RouteReport {
    let sections = Metric::ALL
        .iter()
        .map(|&metric| ReportSection {
            metric,
            title: metric.title().to_string(),
            rows: rank_rows(&analysis.rows, metric, config.num_in_top),
        })
        .collect();

    RouteReport {
        version: REPORT_VERSION.to_string(),
        source: source.to_string(),
        format: analysis.format_name.clone(),
        lines_read: analysis.lines_read,
        parse_errors: analysis.parse_errors,
        summary: analysis.summary.clone(),
        sections,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &RouteReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    super::validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a report back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<RouteReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: RouteReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(report)
}
