//! Error types for fragment parsing and schema loading.

use thiserror::Error;

/// Errors that can occur while parsing a fragment or loading a schema description.
///
/// Validation failures are not errors in this sense: they are returned as data
/// (see [`crate::validator::ValidationError`]) so a single pass reports all of them.
#[derive(Error, Debug)]
pub enum RulesetError {
    /// The fragment text could not be parsed.
    /// Includes the 1-based line number where the error was detected.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The schema description is JSON but uses a field in a way we cannot model.
    /// `path` locates the offending node inside the description.
    #[error("schema error at {path}: {reason}")]
    Schema { path: String, reason: String },

    /// The schema description was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout ruleset-core.
pub type Result<T> = std::result::Result<T, RulesetError>;
