//! Access log line formats.
//!
//! This module handles:
//! - Compiling `$placeholder` templates into line matchers
//! - The registry of named templates
//! - Guessing the format of a log from a sample line

pub mod registry;
pub mod template;

// Re-export main types
pub use registry::{detect, DetectedFormat, FormatRegistry, COMBINED, COMBINED_DURATION};
pub use template::{compile, parse_status, LineFields, LineMatcher, LogRecord};
