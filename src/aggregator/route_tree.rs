//! Adaptive per-segment route statistics.
//!
//! Every request is attributed to the chain of nodes matching its path
//! segments. Each node keeps a wildcard child that sees all traffic through
//! its position, and, until the node collapses, a literal child per distinct
//! segment. A node collapses the first time it sees a segment that looks
//! like an identifier (a numeric id or a long slug); from then on only the
//! wildcard child keeps receiving traffic.
//!
//! Because both the wildcard and the literal branch are followed below a
//! node that has not collapsed, one request can touch up to `2^depth`
//! nodes; see [`RouteTree::add_request`].
//!
//! Nodes live in an arena and refer to each other by [`NodeId`].

use crate::utils::config::{
    NOT_FOUND_STATUS, SERVER_ERROR_STATUSES, SLUG_HYPHEN_THRESHOLD, WILDCARD_LABEL,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a node in the tree's arena
pub type NodeId = usize;

/// The unnamed node representing the whole log
pub const ROOT: NodeId = 0;

/// Counters accumulated for one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCounters {
    pub calls: u64,
    pub errors_404: u64,
    pub errors_5xx: u64,
    /// Sum of request durations in seconds
    pub total_duration: f64,
}

impl RouteCounters {
    /// Count one request
    pub fn record(&mut self, status: u16, duration_seconds: f64) {
        self.calls += 1;
        if status == NOT_FOUND_STATUS {
            self.errors_404 += 1;
        } else if SERVER_ERROR_STATUSES.contains(&status) {
            self.errors_5xx += 1;
        }
        self.total_duration += duration_seconds;
    }

    /// Mean duration, `None` when no request was counted
    pub fn average_duration(&self) -> Option<f64> {
        if self.calls == 0 {
            None
        } else {
            Some(self.total_duration / self.calls as f64)
        }
    }

    /// Counters of `self` not accounted for by `other`
    pub fn saturating_sub(&self, other: &RouteCounters) -> RouteCounters {
        RouteCounters {
            calls: self.calls.saturating_sub(other.calls),
            errors_404: self.errors_404.saturating_sub(other.errors_404),
            errors_5xx: self.errors_5xx.saturating_sub(other.errors_5xx),
            total_duration: (self.total_duration - other.total_duration).max(0.0),
        }
    }
}

/// One path segment at one depth
#[derive(Debug, Clone)]
pub struct RouteNode {
    label: String,
    is_collapsed: bool,
    children: BTreeMap<String, NodeId>,
    wildcard: Option<NodeId>,
    counters: RouteCounters,
}

impl RouteNode {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_collapsed: false,
            children: BTreeMap::new(),
            wildcard: None,
            counters: RouteCounters::default(),
        }
    }

    /// Literal segment, [`WILDCARD_LABEL`] for wildcard nodes, empty for the root
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether children are no longer tracked individually
    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    pub fn counters(&self) -> &RouteCounters {
        &self.counters
    }

    pub fn wildcard(&self) -> Option<NodeId> {
        self.wildcard
    }

    /// Literal children in label order
    pub fn literal_children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(label, &id)| (label.as_str(), id))
    }

    pub fn literal_child(&self, segment: &str) -> Option<NodeId> {
        self.children.get(segment).copied()
    }

    /// Number of distinct children, wildcard included
    pub fn child_count(&self) -> usize {
        self.children.len() + usize::from(self.wildcard.is_some())
    }

    pub fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }
}

/// Arena-backed route statistics tree
#[derive(Debug, Clone)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
}

impl Default for RouteTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTree {
    /// Tree holding only an empty root
    pub fn new() -> Self {
        Self {
            nodes: vec![RouteNode::new("")],
        }
    }

    pub fn root(&self) -> &RouteNode {
        &self.nodes[ROOT]
    }

    /// # Panics
    /// If `id` was not handed out by this tree
    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id]
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True while no child has been created
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Follow a chain of labels from the root, [`WILDCARD_LABEL`] selecting
    /// the wildcard child
    pub fn find(&self, labels: &[&str]) -> Option<NodeId> {
        labels.iter().try_fold(ROOT, |id, label| {
            let node = self.node(id);
            if *label == WILDCARD_LABEL {
                node.wildcard()
            } else {
                node.literal_child(label)
            }
        })
    }

    /// Attribute one request to the tree
    ///
    /// Anything before the first `/` is ignored and descent stops at the
    /// first empty segment, so `/shop/` counts like `/shop`. A path without
    /// any segment is counted at the root only. Never fails.
    ///
    /// # Performance
    /// Every non-collapsed level forks into its wildcard and literal
    /// children, so a path of `n` segments none of which collapses visits
    /// and may create `2^(n+1) - 1` nodes. Identifier-like segments cut the
    /// literal branch, which keeps ordinary routes shallow, but a long
    /// crafted path (scanners walking `/a/b/c/...`) grows memory
    /// exponentially with its depth.
    pub fn add_request(&mut self, path: &str, status: u16, duration_seconds: f64) {
        let segments: Vec<&str> = match path.split_once('/') {
            Some((_, rest)) => rest.split('/').take_while(|s| !s.is_empty()).collect(),
            None => Vec::new(),
        };

        self.record(ROOT, &segments, status, duration_seconds);
    }

    fn record(&mut self, id: NodeId, segments: &[&str], status: u16, duration_seconds: f64) {
        self.nodes[id].counters.record(status, duration_seconds);

        let Some((segment, rest)) = segments.split_first() else {
            return;
        };

        // Sticky: a collapsed node never tracks literal children again.
        if is_high_cardinality(segment) {
            self.nodes[id].is_collapsed = true;
        }

        let wildcard = self.wildcard_child(id);
        self.record(wildcard, rest, status, duration_seconds);

        if !self.nodes[id].is_collapsed {
            let child = self.literal_child(id, segment);
            self.record(child, rest, status, duration_seconds);
        }
    }

    fn wildcard_child(&mut self, parent: NodeId) -> NodeId {
        if let Some(id) = self.nodes[parent].wildcard {
            return id;
        }
        let id = self.push(WILDCARD_LABEL);
        self.nodes[parent].wildcard = Some(id);
        id
    }

    fn literal_child(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(id) = self.nodes[parent].literal_child(segment) {
            return id;
        }
        let id = self.push(segment);
        self.nodes[parent].children.insert(segment.to_string(), id);
        id
    }

    fn push(&mut self, label: &str) -> NodeId {
        self.nodes.push(RouteNode::new(label));
        self.nodes.len() - 1
    }
}

/// Whether a segment looks like an identifier rather than a route name
///
/// True for slugs (at least three hyphens) and for anything that parses as
/// a signed 64-bit integer.
pub fn is_high_cardinality(segment: &str) -> bool {
    segment.matches('-').count() >= SLUG_HYPHEN_THRESHOLD || segment.parse::<i64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_cardinality_segments() {
        assert!(is_high_cardinality("42"));
        assert!(is_high_cardinality("-7"));
        assert!(is_high_cardinality("robe-longue-en-soie"));
        assert!(!is_high_cardinality("blouses-femme"));
        assert!(!is_high_cardinality("v2"));
        assert!(!is_high_cardinality("99999999999999999999"));
    }

    #[test]
    fn test_counters_record_statuses() {
        let mut counters = RouteCounters::default();
        for status in [200, 404, 500, 502, 503, 504, 501, 301] {
            counters.record(status, 0.5);
        }

        assert_eq!(counters.calls, 8);
        assert_eq!(counters.errors_404, 1);
        assert_eq!(counters.errors_5xx, 4);
        assert_eq!(counters.total_duration, 4.0);
        assert_eq!(counters.average_duration(), Some(0.5));
    }

    #[test]
    fn test_average_duration_without_calls() {
        assert_eq!(RouteCounters::default().average_duration(), None);
    }

    #[test]
    fn test_literal_and_wildcard_counted_together() {
        let mut tree = RouteTree::new();
        tree.add_request("/shop/cart", 200, 0.25);
        tree.add_request("/shop/cart", 404, 0.25);

        let literal = tree.find(&["shop", "cart"]).unwrap();
        let wildcard = tree.find(&["shop", "xxx"]).unwrap();
        assert_eq!(tree.node(literal).counters(), tree.node(wildcard).counters());
        assert_eq!(tree.node(literal).counters().errors_404, 1);
    }

    #[test]
    fn test_node_count_doubles_per_level() {
        let mut tree = RouteTree::new();
        tree.add_request("/a/b", 200, 0.0);
        // root + {a, xxx} + {b, xxx} under each
        assert_eq!(tree.len(), 7);

        tree.add_request("/a/b/c", 200, 0.0);
        assert_eq!(tree.len(), 15);
    }

    #[test]
    fn test_collapse_is_sticky() {
        let mut tree = RouteTree::new();
        tree.add_request("/item/details", 200, 0.0);
        tree.add_request("/item/42", 200, 0.0);
        tree.add_request("/item/details", 200, 0.0);

        let item = tree.find(&["item"]).unwrap();
        assert!(tree.node(item).is_collapsed());

        // The literal child stopped receiving traffic at collapse time.
        let details = tree.find(&["item", "details"]).unwrap();
        assert_eq!(tree.node(details).counters().calls, 1);
        assert!(tree.find(&["item", "42"]).is_none());

        let wildcard = tree.find(&["item", "xxx"]).unwrap();
        assert_eq!(tree.node(wildcard).counters().calls, 3);
    }

    #[test]
    fn test_root_only_paths() {
        let mut tree = RouteTree::new();
        tree.add_request("", 200, 0.0);
        tree.add_request("/", 200, 0.0);
        tree.add_request("*", 200, 0.0);

        assert_eq!(tree.root().counters().calls, 3);
        assert!(tree.root().is_leaf());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_segment_ends_descent() {
        let mut tree = RouteTree::new();
        tree.add_request("/a//b", 200, 0.0);
        tree.add_request("/a/", 200, 0.0);

        let a = tree.find(&["a"]).unwrap();
        assert!(tree.node(a).is_leaf());
        assert_eq!(tree.node(a).counters().calls, 2);
    }

    #[test]
    fn test_literal_xxx_does_not_alias_wildcard() {
        let mut tree = RouteTree::new();
        tree.add_request("/xxx", 200, 0.0);

        let root = tree.root();
        assert_eq!(root.child_count(), 2);
        assert_ne!(root.wildcard(), root.literal_child("xxx"));
    }
}
