//! Configuration and constants for the analyzer.

/// Label of the reserved child that aggregates every segment at a position
pub const WILDCARD_LABEL: &str = "xxx";

/// Default number of rows printed per top section
pub const DEFAULT_NUM_IN_TOP: usize = 10;

/// Default report-time merge factor
pub const DEFAULT_ROUTE_MERGE_FACTOR: u64 = 10;

/// Segments with at least this many hyphens are treated as slugs
pub const SLUG_HYPHEN_THRESHOLD: usize = 3;

pub const NOT_FOUND_STATUS: u16 = 404;
/// Stand-in for status codes that cannot equal a tracked code
pub const UNTRACKED_STATUS: u16 = 0;
pub const SERVER_ERROR_STATUSES: &[u16] = &[500, 502, 503, 504];

/// Current JSON report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Run-level knobs threaded through flattening and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Number of rows kept in each top-N section
    pub num_in_top: usize,

    /// A node whose child count exceeds `calls / route_merge_factor`
    /// is reported through its wildcard child only
    pub route_merge_factor: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_in_top: DEFAULT_NUM_IN_TOP,
            route_merge_factor: DEFAULT_ROUTE_MERGE_FACTOR,
        }
    }
}

impl AnalyzerConfig {
    pub fn new(num_in_top: usize, route_merge_factor: u64) -> Self {
        Self {
            num_in_top,
            route_merge_factor,
        }
    }
}
