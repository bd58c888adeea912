//! Route Stats
//!
//! Per-route traffic, error and latency reports from web server access
//! logs. Log lines are matched against a `$placeholder` line template,
//! aggregated into an adaptive route tree that folds identifier-like path
//! segments into `xxx` wildcards, and ranked into top-N sections.
//!
//! This crate provides the core implementation for the `loganalyzer` CLI:
//!
//! ```bash
//! loganalyzer analyze access.log.gz --top 20
//! ```

pub mod aggregator;
pub mod commands;
pub mod input;
pub mod output;
pub mod parser;
pub mod utils;
