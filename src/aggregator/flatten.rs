//! Flatten a route tree into reportable rows.
//!
//! The walk decides at every node whether to report the node's literal
//! children or to fold them into the wildcard child. Folding happens when
//! the node collapsed while aggregating, or when it has more distinct
//! children than `calls / route_merge_factor`. The root only folds when it
//! collapsed itself, so top-level sections are always reported by name.

use super::route_tree::{NodeId, RouteCounters, RouteTree, ROOT};
use crate::utils::config::{AnalyzerConfig, WILDCARD_LABEL};
use log::debug;
use serde::{Deserialize, Serialize};

/// One reportable route
///
/// A snapshot: it does not borrow from the tree it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Joined path such as `/shop/xxx`
    pub route: String,
    pub calls: u64,
    pub errors_404: u64,
    pub errors_5xx: u64,
    pub total_duration: f64,
}

impl ReportRow {
    fn new(route: String, counters: &RouteCounters) -> Self {
        Self {
            route,
            calls: counters.calls,
            errors_404: counters.errors_404,
            errors_5xx: counters.errors_5xx,
            total_duration: counters.total_duration,
        }
    }

    /// Mean duration in seconds, 0 for a row without calls
    pub fn average_duration(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_duration / self.calls as f64
        }
    }
}

/// Flatten `tree` into report rows
///
/// Rows come out in label order, wildcard rows spelled with
/// [`WILDCARD_LABEL`]. Every request that reached at least one segment
/// below the root is counted in exactly one row: a node that is both an
/// endpoint and a prefix of deeper routes gets a row of its own for the
/// requests that ended there. The root itself is never reported.
///
/// A node that collapsed while aggregating always reports through its
/// wildcard, even below the merge threshold. Its literal children stopped
/// receiving traffic at collapse time, so reporting them would drop every
/// later request and break the one-row-per-request coverage above.
///
/// A `route_merge_factor` of 0 is treated as 1.
pub fn flatten(tree: &RouteTree, config: &AnalyzerConfig) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    flatten_node(tree, ROOT, "", config, &mut rows);

    debug!("Flattened {} nodes into {} rows", tree.len(), rows.len());

    rows
}

fn flatten_node(
    tree: &RouteTree,
    id: NodeId,
    route: &str,
    config: &AnalyzerConfig,
    rows: &mut Vec<ReportRow>,
) {
    let node = tree.node(id);

    if node.is_leaf() {
        if id != ROOT {
            rows.push(ReportRow::new(route.to_string(), node.counters()));
        }
        return;
    }

    if id != ROOT {
        // Requests ending here never reached the wildcard child.
        let wildcard_counters = node
            .wildcard()
            .map(|w| *tree.node(w).counters())
            .unwrap_or_default();
        let ended_here = node.counters().saturating_sub(&wildcard_counters);
        if ended_here.calls > 0 {
            rows.push(ReportRow::new(route.to_string(), &ended_here));
        }
    }

    let merge_factor = config.route_merge_factor.max(1);
    let over_threshold = id != ROOT
        && node.child_count() as u64 > node.counters().calls / merge_factor;
    let has_literals = node.literal_children().next().is_some();

    if node.is_collapsed() || over_threshold || !has_literals {
        if let Some(wildcard) = node.wildcard() {
            let child_route = format!("{}/{}", route, WILDCARD_LABEL);
            flatten_node(tree, wildcard, &child_route, config, rows);
        }
        return;
    }

    for (label, child) in node.literal_children() {
        let child_route = format!("{}/{}", route, label);
        flatten_node(tree, child, &child_route, config, rows);
    }
}
