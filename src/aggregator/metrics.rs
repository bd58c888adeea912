//! Rank report rows by metric.
//!
//! The five metrics are the sections of the final report: call volume,
//! 404s, 5xx, average latency and total latency cost.

use super::flatten::ReportRow;
use super::route_tree::RouteCounters;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ranking criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Calls,
    NotFound,
    ServerErrors,
    AverageDuration,
    Cost,
}

impl Metric {
    /// All metrics in report order
    pub const ALL: [Metric; 5] = [
        Metric::Calls,
        Metric::NotFound,
        Metric::ServerErrors,
        Metric::AverageDuration,
        Metric::Cost,
    ];

    /// Section heading used in the text report
    pub fn title(self) -> &'static str {
        match self {
            Metric::Calls => "TOP CALLS",
            Metric::NotFound => "TOP 404",
            Metric::ServerErrors => "TOP 5xx",
            Metric::AverageDuration => "TOP AVG DURATION",
            Metric::Cost => "TOP COST",
        }
    }

    /// Value of this metric for one row
    pub fn value(self, row: &ReportRow) -> MetricValue {
        match self {
            Metric::Calls => MetricValue::Count(row.calls),
            Metric::NotFound => MetricValue::Count(row.errors_404),
            Metric::ServerErrors => MetricValue::Count(row.errors_5xx),
            Metric::AverageDuration => MetricValue::Seconds(row.average_duration()),
            Metric::Cost => MetricValue::Seconds(row.total_duration),
        }
    }

    /// Descending order on this metric
    fn compare_desc(self, a: &ReportRow, b: &ReportRow) -> Ordering {
        match (self.value(a), self.value(b)) {
            (MetricValue::Count(a), MetricValue::Count(b)) => b.cmp(&a),
            (a, b) => b.as_f64().total_cmp(&a.as_f64()),
        }
    }
}

/// A metric value, formatted the way the report prints it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Seconds(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Count(n) => n as f64,
            MetricValue::Seconds(s) => s,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Seconds(s) => write!(f, "{:.3}s", s),
        }
    }
}

/// One line of a top-N section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    /// Position in the section, starting at 0
    pub rank: usize,
    pub route: String,
    pub value: MetricValue,
}

/// Rank rows by `metric`, highest first, keeping the first `top_n`
///
/// The sort is stable: rows with equal values keep their input order.
pub fn rank_rows(rows: &[ReportRow], metric: Metric, top_n: usize) -> Vec<RankedRow> {
    debug!("Ranking {} rows by {:?}", rows.len(), metric);

    let mut sorted: Vec<&ReportRow> = rows.iter().collect();
    sorted.sort_by(|a, b| metric.compare_desc(a, b));

    sorted
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(rank, row)| RankedRow {
            rank,
            route: row.route.clone(),
            value: metric.value(row),
        })
        .collect()
}

/// Whole-log traffic totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub total_calls: u64,
    pub errors_404: u64,
    pub errors_5xx: u64,
    pub total_duration: f64,
    /// Number of rows the tree flattened into
    pub route_count: usize,
}

impl TrafficSummary {
    /// Build from the root counters and the flattened rows
    pub fn new(root: &RouteCounters, rows: &[ReportRow]) -> Self {
        Self {
            total_calls: root.calls,
            errors_404: root.errors_404,
            errors_5xx: root.errors_5xx,
            total_duration: root.total_duration,
            route_count: rows.len(),
        }
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Calls: {} | 404: {} | 5xx: {} | Total duration: {:.3}s | Routes: {}",
            self.total_calls,
            self.errors_404,
            self.errors_5xx,
            self.total_duration,
            self.route_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(route: &str, calls: u64, errors_404: u64, total_duration: f64) -> ReportRow {
        ReportRow {
            route: route.to_string(),
            calls,
            errors_404,
            errors_5xx: 0,
            total_duration,
        }
    }

    #[test]
    fn test_rank_by_calls() {
        let rows = vec![row("/a", 1, 0, 0.0), row("/b", 5, 0, 0.0), row("/c", 3, 0, 0.0)];

        let ranked = rank_rows(&rows, Metric::Calls, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 0);
        assert_eq!(ranked[0].route, "/b");
        assert_eq!(ranked[1].route, "/c");
        assert_eq!(ranked[0].value, MetricValue::Count(5));
    }

    #[test]
    fn test_rank_by_average_duration() {
        let rows = vec![row("/slow", 2, 0, 3.0), row("/busy", 100, 0, 10.0)];

        let ranked = rank_rows(&rows, Metric::AverageDuration, 10);
        assert_eq!(ranked[0].route, "/slow");
        assert_eq!(ranked[0].value.to_string(), "1.500s");

        let ranked = rank_rows(&rows, Metric::Cost, 10);
        assert_eq!(ranked[0].route, "/busy");
        assert_eq!(ranked[0].value.to_string(), "10.000s");
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let rows = vec![row("/a", 1, 1, 0.0), row("/b", 1, 1, 0.0)];

        let ranked = rank_rows(&rows, Metric::NotFound, 10);
        assert_eq!(ranked[0].route, "/a");
        assert_eq!(ranked[1].route, "/b");
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_rows(&[], Metric::Cost, 10).is_empty());
    }

    #[test]
    fn test_metric_titles() {
        let titles: Vec<&str> = Metric::ALL.iter().map(|m| m.title()).collect();
        assert_eq!(
            titles,
            vec!["TOP CALLS", "TOP 404", "TOP 5xx", "TOP AVG DURATION", "TOP COST"]
        );
    }

    #[test]
    fn test_traffic_summary() {
        let mut root = RouteCounters::default();
        root.record(404, 0.5);
        root.record(503, 0.25);

        let summary = TrafficSummary::new(&root, &[row("/a", 2, 1, 0.75)]);
        assert_eq!(summary.total_calls, 2);
        assert_eq!(summary.errors_5xx, 1);
        assert_eq!(
            summary.summary(),
            "Calls: 2 | 404: 1 | 5xx: 1 | Total duration: 0.750s | Routes: 1"
        );
    }
}
