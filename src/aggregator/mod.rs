//! Aggregation of access log requests into route statistics.
//!
//! This module transforms parsed log lines into:
//! - An adaptive per-segment route tree
//! - A flat list of reportable routes
//! - Top-N rankings per metric

pub mod flatten;
pub mod ingest;
pub mod metrics;
pub mod route_tree;

// Re-export main types and functions
pub use flatten::{flatten, ReportRow};
pub use ingest::{Analysis, LogAnalyzer};
pub use metrics::{rank_rows, Metric, MetricValue, RankedRow, TrafficSummary};
pub use route_tree::{is_high_cardinality, NodeId, RouteCounters, RouteNode, RouteTree, ROOT};
