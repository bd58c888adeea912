//! Line template compilation.
//!
//! A template is literal text interleaved with `$placeholders`, for example
//! `$remote_addr - $remote_user [$time_local] "$request" $status ...`.
//! Compiling it yields a [`LineMatcher`]: a regular expression with named
//! captures for the fields the aggregator consumes.

use crate::utils::config::UNTRACKED_STATUS;
use crate::utils::error::FormatError;
use log::debug;
use regex::Regex;

/// Placeholder → sub-pattern table
///
/// Only `url` and `status` are required by the aggregator; `duration` is
/// optional. The other captures are kept for debugging custom templates.
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    (
        "$remote_addr",
        r"(?P<remote_addr>[0-9]{1,3}.[0-9]{1,3}.[0-9]{1,3}.[0-9]{1,3})",
    ),
    ("$remote_user", r"[[:alnum:]-]+"),
    ("$time_local", r"[[:alnum:] :/+-]+"),
    (
        "$request",
        r"(?P<verb>[A-Z]+) (?P<url>[^\?]+)(\?.*)? HTTP/[0-9.]+",
    ),
    ("$status", r"(?P<status>[0-9]+)"),
    ("$body_bytes_sent", r"(?P<bytes>[0-9]+)"),
    ("$http_referer", r#"[^"]+"#),
    ("$http_user_agent", r#"[^"]+"#),
    ("$duration_seconds", r"(?P<duration>[0-9.]+)"),
];

/// Capture groups every usable template must provide
const REQUIRED_FIELDS: &[&str] = &["url", "status"];

/// Raw captures extracted from one matching line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub verb: Option<&'a str>,
    pub url: &'a str,
    pub status: &'a str,
    pub duration: Option<&'a str>,
}

/// One request, converted and ready for the route tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord<'a> {
    /// Request path, query string already removed
    pub path: &'a str,
    pub status: u16,
    /// 0 when the template has no duration placeholder
    pub duration_seconds: f64,
}

/// Compiled line template
#[derive(Debug, Clone)]
pub struct LineMatcher {
    template: String,
    regex: Regex,
    has_duration: bool,
}

impl LineMatcher {
    /// Template this matcher was compiled from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether matched lines carry a duration
    pub fn has_duration(&self) -> bool {
        self.has_duration
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Extract the raw field captures, or `None` if the line does not match
    pub fn fields<'a>(&self, line: &'a str) -> Option<LineFields<'a>> {
        let caps = self.regex.captures(line)?;

        Some(LineFields {
            verb: caps.name("verb").map(|m| m.as_str()),
            url: caps.name("url")?.as_str(),
            status: caps.name("status")?.as_str(),
            duration: caps.name("duration").map(|m| m.as_str()),
        })
    }

    /// Match a line and convert its fields
    ///
    /// Returns `None` when the line does not match; callers count that as a
    /// parse error. See [`parse_status`] for odd status codes. A duration
    /// that is captured but unparsable is read as 0.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<LogRecord<'a>> {
        let fields = self.fields(line)?;
        let status = parse_status(fields.status);

        let duration_seconds = fields
            .duration
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        Some(LogRecord {
            path: fields.url,
            status,
            duration_seconds,
        })
    }
}

/// Convert a captured status code
///
/// Tracked codes are compared on their exact text, so zero-padded (`0404`)
/// or oversized codes map to [`UNTRACKED_STATUS`]: the request is still
/// counted, just never as a 404 or 5xx.
pub fn parse_status(raw: &str) -> u16 {
    let canonical = raw == "0" || !raw.starts_with('0');
    match raw.parse::<u16>() {
        Ok(status) if canonical => status,
        _ => {
            debug!("Untracked status code: {}", raw);
            UNTRACKED_STATUS
        }
    }
}

/// Compile a line template into a [`LineMatcher`]
///
/// Square brackets are literal in templates (`[$time_local]`) but form
/// character classes in the regex engine, so they are escaped before the
/// placeholders are substituted.
///
/// # Errors
/// * `FormatError::InvalidTemplate` - the expanded pattern is not a valid regex
/// * `FormatError::MissingField` - no `url` or `status` capture
pub fn compile(template: &str) -> Result<LineMatcher, FormatError> {
    let mut pattern = template.replace('[', r"\[").replace(']', r"\]");
    for (placeholder, sub_pattern) in PLACEHOLDERS {
        pattern = pattern.replace(placeholder, sub_pattern);
    }

    let regex = Regex::new(&pattern).map_err(|source| FormatError::InvalidTemplate {
        template: template.to_string(),
        source,
    })?;

    let captures: Vec<&str> = regex.capture_names().flatten().collect();
    for &field in REQUIRED_FIELDS {
        if !captures.contains(&field) {
            return Err(FormatError::MissingField {
                field,
                template: template.to_string(),
            });
        }
    }

    Ok(LineMatcher {
        template: template.to_string(),
        has_duration: captures.contains(&"duration"),
        regex,
    })
}
