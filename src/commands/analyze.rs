//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Opens the log (decompressing `.gz` files)
//! 2. Selects or guesses the line format
//! 3. Aggregates every matching line into the route tree
//! 4. Flattens the tree into report rows
//! 5. Prints the top-N sections and optionally writes a JSON report

use super::models::AnalyzeArgs;
use crate::aggregator::{Analysis, LogAnalyzer};
use crate::input::open_log;
use crate::output::{build_report, render_report, write_report};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * The log cannot be opened, decompressed or read
/// * The requested format is unknown or invalid
/// * No format was requested and none matches the first line
/// * The JSON report cannot be written
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<Analysis> {
    let start_time = Instant::now();

    info!("Analyzing log: {}", args.log_file.display());

    let lines = open_log(&args.log_file).context("Failed to open log")?;

    let mut analyzer =
        LogAnalyzer::new(args.format.as_deref()).context("Failed to set up log format")?;

    for line in lines {
        let line = line.context("Failed to read log")?;
        analyzer.feed_line(&line)?;
    }

    let analysis = analyzer.finish(&args.config);

    info!(
        "Read {} lines with format {}",
        analysis.lines_read,
        analysis.format_name.as_deref().unwrap_or("-")
    );
    if analysis.parse_errors > 0 {
        warn!(
            "{} lines did not match the log format",
            analysis.parse_errors
        );
    }
    info!("Traffic: {}", analysis.summary.summary());
    debug!("Route tree holds {} nodes", analysis.tree.len());

    if args.print_report {
        print!("{}", render_report(&analysis.rows, &args.config));
    }

    if let Some(json_path) = &args.output_json {
        let source = args.log_file.display().to_string();
        let report = build_report(&analysis, &source, &args.config);
        write_report(&report, json_path).context("Failed to write JSON report")?;

        info!("✓ Report written to: {}", json_path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(analysis)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.log_file.as_os_str().is_empty() {
        anyhow::bail!("Log file path cannot be empty");
    }

    if args.config.num_in_top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.config.route_merge_factor == 0 {
        anyhow::bail!("merge factor must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::AnalyzerConfig;
    use std::path::PathBuf;

    fn args() -> AnalyzeArgs {
        AnalyzeArgs {
            log_file: PathBuf::from("access.log"),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&args()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_path() {
        assert!(validate_args(&AnalyzeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_top_zero() {
        let args = AnalyzeArgs {
            config: AnalyzerConfig::new(0, 10),
            ..args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_large_top_accepted() {
        let args = AnalyzeArgs {
            config: AnalyzerConfig::new(1_000_000, 10),
            ..args()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_merge_factor_zero() {
        let args = AnalyzeArgs {
            config: AnalyzerConfig::new(10, 0),
            ..args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_missing_log_is_an_error() {
        let args = AnalyzeArgs {
            log_file: PathBuf::from("/nonexistent/access.log"),
            print_report: false,
            ..Default::default()
        };
        assert!(execute_analyze(&args).is_err());
    }
}
