//! Structural validation of parsed fragments against a [`SchemaNode`] tree.
//!
//! The validator never stops at the first problem: every violation found in
//! one depth-first pass is collected, so a single call reports everything.
//!
//! # Traversal order
//!
//! For an object schema, declared `properties` are visited in declaration
//! order (keys missing from the instance are skipped), then keys not covered
//! by `properties` in the instance's own order. Array elements are visited by
//! index. Nothing below a type mismatch is checked.
//!
//! # Paths
//!
//! - `rulesets.ruff` -- key `ruff` inside table `rulesets`
//! - `rulesets.ruff.extend-select[1]` -- second element of an array
//! - empty -- the document root

use crate::schema::{AdditionalProperties, SchemaNode};
use crate::types::{Document, Kind, Table, Value};
use std::fmt;

/// Severity values accepted as a bare lint rule setting.
const LINT_SEVERITIES: [&str; 3] = ["off", "warn", "error"];

/// A single structural violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted/bracketed locator into the document. Empty for the root.
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validate a value against `schema`, starting at the root path.
///
/// # Examples
///
/// ```
/// use ruleset_core::{validate, SchemaNode, Value};
///
/// let schema = SchemaNode::Array { items: Box::new(SchemaNode::String) };
/// let value = Value::Array(vec!["a".into(), Value::Number(5.0)]);
/// let errors = validate(&value, &schema);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].to_string(), "[1]: expected string, got number");
/// ```
pub fn validate(instance: &Value, schema: &SchemaNode) -> Vec<ValidationError> {
    validate_at(instance, schema, "")
}

/// Validate a value against `schema`, prefixing every reported path with `path`.
pub fn validate_at(instance: &Value, schema: &SchemaNode, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check(instance, schema, path, &mut errors);
    errors
}

/// Validate a whole parsed document (a root table) without wrapping it in a [`Value`].
pub fn validate_document(document: &Document, schema: &SchemaNode) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match schema {
        SchemaNode::Object {
            properties,
            additional_properties,
        } => check_object(document, properties, *additional_properties, "", &mut errors),
        SchemaNode::Any => {}
        other => mismatch(expected_kind(other), Kind::Object, "", &mut errors),
    }
    errors
}

/// Internal recursive walk. Pushes into `errors` instead of returning early.
fn check(instance: &Value, schema: &SchemaNode, path: &str, errors: &mut Vec<ValidationError>) {
    match schema {
        SchemaNode::Any => {}
        SchemaNode::Object {
            properties,
            additional_properties,
        } => match instance {
            Value::Table(table) => {
                check_object(table, properties, *additional_properties, path, errors)
            }
            other => mismatch("object", other.kind(), path, errors),
        },
        SchemaNode::Array { items } => match instance {
            Value::Array(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    check(element, items, &format!("{path}[{i}]"), errors);
                }
            }
            other => mismatch("array", other.kind(), path, errors),
        },
        SchemaNode::Integer { exclusive_minimum } => match instance {
            Value::Number(n) if is_integral(*n) => {
                if let Some(bound) = exclusive_minimum {
                    if *n <= *bound {
                        push(errors, path, format!("value must be > {bound}"));
                    }
                }
            }
            other => mismatch("integer", other.kind(), path, errors),
        },
        SchemaNode::String => {
            if !matches!(instance, Value::String(_)) {
                mismatch("string", instance.kind(), path, errors);
            }
        }
    }
}

fn check_object(
    table: &Table,
    properties: &[(String, SchemaNode)],
    additional: AdditionalProperties,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    for (key, child_schema) in properties {
        if let Some(child) = table.get(key) {
            check(child, child_schema, &child_path(path, key), errors);
        }
    }

    // Only the lint-rule shape is enforced for undeclared keys.
    if additional != AdditionalProperties::LintRuleShape {
        return;
    }
    for (key, value) in table.iter() {
        let declared = properties.iter().any(|(k, _)| k == key);
        if !declared && !is_lint_rule_value(value) {
            push(
                errors,
                &child_path(path, key),
                "invalid ESLint rule value".to_string(),
            );
        }
    }
}

/// `"off"`, `"warn"`, `"error"`, or a non-empty array led by a string.
pub fn is_lint_rule_value(value: &Value) -> bool {
    match value {
        Value::String(s) => LINT_SEVERITIES.contains(&s.as_str()),
        Value::Array(items) => matches!(items.first(), Some(Value::String(_))),
        _ => false,
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

fn expected_kind(schema: &SchemaNode) -> &'static str {
    match schema {
        SchemaNode::Object { .. } => "object",
        SchemaNode::Array { .. } => "array",
        SchemaNode::Integer { .. } => "integer",
        SchemaNode::String => "string",
        SchemaNode::Any => "any",
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn mismatch(expected: &str, got: Kind, path: &str, errors: &mut Vec<ValidationError>) {
    push(errors, path, format!("expected {expected}, got {got}"));
}

fn push(errors: &mut Vec<ValidationError>, path: &str, message: String) {
    errors.push(ValidationError {
        path: path.to_string(),
        message,
    });
}
