use crate::utils::config::AnalyzerConfig;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Access log to read (plain or `.gz`)
    pub log_file: PathBuf,

    /// Template name or literal template; `None` to guess from the first line
    pub format: Option<String>,

    /// Top-N size and report-time merge factor
    pub config: AnalyzerConfig,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print the text report to stdout
    pub print_report: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            log_file: PathBuf::new(),
            format: None,
            config: AnalyzerConfig::default(),
            output_json: None,
            print_report: true,
        }
    }
}
