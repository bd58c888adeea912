//! JSON report schema definitions.
//!
//! This module defines the structure of the JSON report written with
//! `--json`. Schema is versioned to allow future evolution.

use crate::aggregator::{Metric, RankedRow, TrafficSummary};
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Log file the report was computed from
    pub source: String,

    /// Line format used, `None` for an empty log
    pub format: Option<String>,

    /// Lines read from the log, blank ones included
    pub lines_read: u64,

    /// Lines that did not match the line format
    pub parse_errors: u64,

    /// Whole-log totals
    pub summary: TrafficSummary,

    /// One section per metric, in report order
    pub sections: Vec<ReportSection>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Top-N rows for one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub metric: Metric,
    pub title: String,
    pub rows: Vec<RankedRow>,
}
