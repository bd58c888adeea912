//! Feed raw log lines through a line format into the route tree.

use super::flatten::{flatten, ReportRow};
use super::metrics::TrafficSummary;
use super::route_tree::RouteTree;
use crate::parser::{DetectedFormat, FormatRegistry};
use crate::utils::config::AnalyzerConfig;
use crate::utils::error::FormatError;
use log::{debug, info};

/// Streaming line consumer
///
/// With an explicit format the matcher is compiled up front. Otherwise the
/// format is guessed from the first non-blank line; failing to guess is
/// fatal. Lines that do not match the active format are tallied as parse
/// errors and skipped.
#[derive(Debug)]
pub struct LogAnalyzer {
    registry: FormatRegistry,
    active: Option<DetectedFormat>,
    tree: RouteTree,
    lines_read: u64,
    parse_errors: u64,
}

/// Result of consuming a whole log
#[derive(Debug, Clone)]
pub struct Analysis {
    /// `None` when the log held no non-blank line to guess from
    pub format_name: Option<String>,
    pub lines_read: u64,
    pub parse_errors: u64,
    pub summary: TrafficSummary,
    pub rows: Vec<ReportRow>,
    pub tree: RouteTree,
}

impl LogAnalyzer {
    /// Analyzer over the built-in templates
    ///
    /// `format` is a template name, a literal template, or empty/`None` to
    /// guess from the first line.
    pub fn new(format: Option<&str>) -> Result<Self, FormatError> {
        Self::with_registry(FormatRegistry::builtin(), format)
    }

    pub fn with_registry(
        registry: FormatRegistry,
        format: Option<&str>,
    ) -> Result<Self, FormatError> {
        let active = match format.map(str::trim).filter(|f| !f.is_empty()) {
            Some(format) => Some(registry.resolve(format)?),
            None => None,
        };

        Ok(Self {
            registry,
            active,
            tree: RouteTree::new(),
            lines_read: 0,
            parse_errors: 0,
        })
    }

    /// Name of the active format, once known
    pub fn format_name(&self) -> Option<&str> {
        self.active.as_ref().map(|f| f.name.as_str())
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn parse_errors(&self) -> u64 {
        self.parse_errors
    }

    /// Consume one line
    ///
    /// # Errors
    /// * `FormatError::Unrecognized` - no format was given and this first
    ///   non-blank line matches no known template
    pub fn feed_line(&mut self, line: &str) -> Result<(), FormatError> {
        self.lines_read += 1;

        if self.active.is_none() {
            if line.trim().is_empty() {
                self.parse_errors += 1;
                return Ok(());
            }
            let detected = self.registry.detect(line)?;
            info!("Guessed format : {}", detected.name);
            self.active = Some(detected);
        }

        if let Some(active) = &self.active {
            match active.matcher.match_line(line) {
                Some(record) => {
                    self.tree
                        .add_request(record.path, record.status, record.duration_seconds);
                }
                None => {
                    self.parse_errors += 1;
                    debug!("Line {} does not match format {}", self.lines_read, active.name);
                }
            }
        }

        Ok(())
    }

    /// Flatten the tree and wrap up
    pub fn finish(self, config: &AnalyzerConfig) -> Analysis {
        let rows = flatten(&self.tree, config);
        let summary = TrafficSummary::new(self.tree.root().counters(), &rows);

        Analysis {
            format_name: self.active.map(|f| f.name),
            lines_read: self.lines_read,
            parse_errors: self.parse_errors,
            summary,
            rows,
            tree: self.tree,
        }
    }
}
