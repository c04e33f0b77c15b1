//! Fragment parser — converts ruleset text into a [`Document`].
//!
//! Fragments use a small line-oriented subset of TOML:
//!
//! - `# comment` and blank lines
//! - Section headers: `[rulesets.eslint.rules]`
//! - Key lines: `key = value` or `"key" = value`
//!
//! Values are coerced in a fixed order: array literal (`[...]`, JSON syntax with
//! single quotes allowed), double-quoted string (taken verbatim, no escapes),
//! decimal number, and finally the raw text as a string. Lines that are neither
//! a header nor a key line are ignored.
//!
//! # Key design decisions
//!
//! - **Explicit parser state**: the current section path lives in a
//!   [`ParserState`] that each line step takes and hands back, so a call to
//!   [`parse`] has no state beyond its own loop.
//! - **Headers materialize tables**: a header creates every missing table on its
//!   path immediately, so an empty section still shows up in the document.

use crate::error::{Result, RulesetError};
use crate::types::{Document, Table, Value};
use tracing::{debug, trace};

/// Parse a fragment into a document.
///
/// Each call is independent. Fails with [`RulesetError::Parse`] on a malformed
/// array literal or a header that would turn an existing value into a table.
pub fn parse(text: &str) -> Result<Document> {
    let mut document = Table::new();
    let mut state = ParserState::default();

    for (idx, line) in text.lines().enumerate() {
        state = parse_line(&mut document, state, line, idx + 1)?;
    }

    Ok(document)
}

/// Per-fragment parser state threaded through [`parse_line`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Path of the table that key lines assign into. Empty means the root.
    pub section: Vec<String>,
}

/// A classified source line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    /// Blank or comment.
    Skip,
    /// `[a.b.c]` — the text between the brackets.
    Header(&'a str),
    /// `key = value` — key with quotes stripped, value trimmed.
    Assign { key: &'a str, value: &'a str },
    /// Anything else.
    Unrecognized,
}

/// Apply one source line to `document`, returning the state for the next line.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_line(
    document: &mut Document,
    state: ParserState,
    line: &str,
    line_no: usize,
) -> Result<ParserState> {
    match classify_line(line) {
        Line::Skip => Ok(state),
        Line::Header(inner) => {
            let section = split_section_path(inner, line_no)?;
            document
                .ensure_table(&section)
                .map_err(|e| parse_error(line_no, e.to_string()))?;
            debug!(line = line_no, section = %section.join("."), "entering section");
            Ok(ParserState { section })
        }
        Line::Assign { key, value } => {
            let value = coerce_value(value, line_no)?;
            let table = document
                .ensure_table(&state.section)
                .map_err(|e| parse_error(line_no, e.to_string()))?;
            table.insert(key, value);
            Ok(state)
        }
        Line::Unrecognized => {
            trace!(line = line_no, "ignoring unrecognized line");
            Ok(state)
        }
    }
}

fn classify_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Skip;
    }

    // Header: the whole line is `[...]` with no `]` inside.
    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        if !inner.is_empty() && !inner.contains(']') {
            return Line::Header(inner);
        }
    }

    if let Some((key_part, value_part)) = trimmed.split_once('=') {
        let value = value_part.trim();
        if let Some(key) = parse_key(key_part) {
            if !value.is_empty() {
                return Line::Assign { key, value };
            }
        }
    }

    Line::Unrecognized
}

/// Extract a key from the text before `=`, stripping one pair of optional
/// surrounding quotes. Keys may not contain quotes themselves.
fn parse_key(key_part: &str) -> Option<&str> {
    let key = key_part.trim_end();
    let key = key.strip_prefix('"').unwrap_or(key);
    let key = key.strip_suffix('"').unwrap_or(key);
    if key.contains('"') {
        return None;
    }
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

fn split_section_path(inner: &str, line_no: usize) -> Result<Vec<String>> {
    inner
        .split('.')
        .map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                Err(parse_error(
                    line_no,
                    format!("empty segment in table header [{inner}]"),
                ))
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}

/// Coerce the right-hand side of a key line into a [`Value`].
///
/// Order: array literal → quoted string → number → raw string.
fn coerce_value(raw: &str, line_no: usize) -> Result<Value> {
    if raw.starts_with('[') {
        return parse_array_literal(raw, line_no);
    }

    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Ok(Value::String(raw[1..raw.len() - 1].to_string()));
    }

    if is_numeric_literal(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return Ok(Value::Number(n));
        }
    }

    Ok(Value::String(raw.to_string()))
}

/// Parse `[...]` as a JSON array after turning single quotes into double quotes.
fn parse_array_literal(raw: &str, line_no: usize) -> Result<Value> {
    if !raw.ends_with(']') {
        return Err(parse_error(line_no, "unterminated array literal".to_string()));
    }

    let normalized = raw.replace('\'', "\"");
    let json: serde_json::Value = serde_json::from_str(&normalized)
        .map_err(|e| parse_error(line_no, format!("invalid array literal: {e}")))?;

    match json {
        serde_json::Value::Array(_) => Ok(Value::from_json(json)),
        _ => Err(parse_error(line_no, "invalid array literal".to_string())),
    }
}

/// `[+-]? digits [. digits]`, where either side of the point may be empty but
/// not both. No exponents, no underscores, no `inf`/`nan`.
fn is_numeric_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    !(int_part.is_empty() && frac_part.is_empty()) && all_digits(int_part) && all_digits(frac_part)
}

fn parse_error(line: usize, reason: String) -> RulesetError {
    RulesetError::Parse { line, reason }
}
