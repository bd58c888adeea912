//! Named line templates and format auto-detection.

use super::template::{compile, LineMatcher};
use crate::utils::error::FormatError;
use log::debug;
use std::collections::BTreeMap;

/// NCSA combined log format
pub const COMBINED: &str = r#"$remote_addr - $remote_user [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent""#;

/// Combined log format followed by a request duration in seconds
/// as the last field (nginx `$request_time`)
pub const COMBINED_DURATION: &str = r#"$remote_addr - $remote_user [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent".* $duration_seconds"#;

/// Name reported for templates passed literally on the command line
pub const CUSTOM_FORMAT_NAME: &str = "custom";

/// A compiled format together with the name it was selected under
#[derive(Debug, Clone)]
pub struct DetectedFormat {
    pub name: String,
    pub matcher: LineMatcher,
}

/// Set of named templates to choose from
///
/// Templates are kept ordered by name so detection is deterministic.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    templates: BTreeMap<String, String>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormatRegistry {
    /// Registry with no templates
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in templates
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("combined", COMBINED);
        registry.register("combined_duration", COMBINED_DURATION);
        registry
    }

    /// Add or replace a named template
    pub fn register(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Iterate `(name, template)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(name, template)| (name.as_str(), template.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Pick the template that matches `sample`
    ///
    /// Among matching templates the longest template string wins. Candidates
    /// are visited in name order and only a strictly longer match replaces
    /// the current best, so ties go to the lexicographically smallest name.
    ///
    /// # Errors
    /// * `FormatError::Unrecognized` - no template matches the sample
    /// * any compile error from a registered template
    pub fn detect(&self, sample: &str) -> Result<DetectedFormat, FormatError> {
        let mut best: Option<DetectedFormat> = None;

        for (name, template) in self.iter() {
            let best_len = best.as_ref().map_or(0, |b| b.matcher.template().len());
            if template.len() <= best_len {
                continue;
            }

            let matcher = compile(template)?;
            if matcher.is_match(sample) {
                debug!("Template {} matches sample line", name);
                best = Some(DetectedFormat {
                    name: name.to_string(),
                    matcher,
                });
            }
        }

        best.ok_or_else(|| FormatError::Unrecognized {
            sample: sample.to_string(),
        })
    }

    /// Resolve an explicitly requested format
    ///
    /// `format` is either a registered name or a literal template containing
    /// at least one `$placeholder`.
    pub fn resolve(&self, format: &str) -> Result<DetectedFormat, FormatError> {
        if let Some(template) = self.get(format) {
            return Ok(DetectedFormat {
                name: format.to_string(),
                matcher: compile(template)?,
            });
        }

        if format.contains('$') {
            return Ok(DetectedFormat {
                name: CUSTOM_FORMAT_NAME.to_string(),
                matcher: compile(format)?,
            });
        }

        Err(FormatError::UnknownFormat(format.to_string()))
    }
}

/// Detect a format among `candidates` for one sample line
///
/// Convenience wrapper around [`FormatRegistry::detect`].
pub fn detect(candidates: &FormatRegistry, sample: &str) -> Result<DetectedFormat, FormatError> {
    candidates.detect(sample)
}
