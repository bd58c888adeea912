//! loganalyzer CLI
//!
//! Ranks the routes of a web server access log by call volume, error
//! rates and latency.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use route_stats::commands::{
    display_formats, display_version, execute_analyze, validate_args, AnalyzeArgs,
};
use route_stats::utils::config::{
    AnalyzerConfig, DEFAULT_NUM_IN_TOP, DEFAULT_ROUTE_MERGE_FACTOR,
};
use std::path::PathBuf;

/// loganalyzer - per-route statistics from access logs
#[derive(Parser, Debug)]
#[command(name = "loganalyzer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze an access log and print the top routes
    Analyze {
        /// Access log file (plain or .gz)
        file: PathBuf,

        /// Number of items in each top section
        #[arg(short, long, default_value_t = DEFAULT_NUM_IN_TOP)]
        top: usize,

        /// Merge factor for route computation
        #[arg(short = 'm', long, default_value_t = DEFAULT_ROUTE_MERGE_FACTOR)]
        merge_factor: u64,

        /// Log format name or template (guessed from the first line if omitted)
        #[arg(short, long, env = "LOGANALYZER_FORMAT")]
        format: Option<String>,

        /// Output path for a JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List known log formats
    Formats {
        /// Show the templates
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            file,
            top,
            merge_factor,
            format,
            json,
        } => {
            let args = AnalyzeArgs {
                log_file: file,
                format,
                config: AnalyzerConfig::new(top, merge_factor),
                output_json: json,
                print_report: true,
            };

            validate_args(&args)?;
            execute_analyze(&args)?;
        }

        Commands::Formats { show } => {
            display_formats(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
