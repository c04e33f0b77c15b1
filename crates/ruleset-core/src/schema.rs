//! Structural schema description.
//!
//! A [`SchemaNode`] tree is loaded from a JSON schema document. Only the
//! vocabulary needed to check ruleset fragments is understood:
//!
//! | field                  | meaning                                          |
//! |------------------------|--------------------------------------------------|
//! | `type`                 | `object`, `array`, `string` or `integer`         |
//! | `properties`           | object members, kept in declaration order        |
//! | `additionalProperties` | `false`, absent, or `{ "anyOf": [...] }` for lint rules |
//! | `items`                | array element schema                             |
//! | `exclusiveMinimum`     | strict lower bound for integers                  |
//!
//! Every other field is ignored. A node without a recognised `type` accepts
//! anything, so a fuller schema still loads.

use crate::error::{Result, RulesetError};
use serde_json::{Map, Value as Json};

/// One node of the structural description tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object {
        /// Declared members, in declaration order.
        properties: Vec<(String, SchemaNode)>,
        additional_properties: AdditionalProperties,
    },
    Array {
        items: Box<SchemaNode>,
    },
    Integer {
        exclusive_minimum: Option<f64>,
    },
    String,
    /// No constraint.
    Any,
}

/// How an object treats keys that are not in its `properties`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalProperties {
    /// Absent, `true`, or an object schema we do not enforce.
    None,
    /// `false`. Not enforced during validation.
    RejectAll,
    /// `{ "anyOf": [...] }`: each extra key must hold a lint rule setting.
    LintRuleShape,
}

impl SchemaNode {
    /// Parse a schema description from JSON text.
    pub fn from_json_str(text: &str) -> Result<SchemaNode> {
        let json: Json = serde_json::from_str(text)?;
        SchemaNode::from_json(&json)
    }

    /// Build a schema tree from an already-parsed JSON document.
    pub fn from_json(json: &Json) -> Result<SchemaNode> {
        node_from_json(json, "#")
    }

    /// Look up a declared property of an object schema.
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { properties, .. } => {
                properties.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

fn node_from_json(json: &Json, path: &str) -> Result<SchemaNode> {
    let obj = match json {
        Json::Object(obj) => obj,
        // Boolean schemas are not enforced: `true` and `false` both accept anything.
        Json::Bool(_) => return Ok(SchemaNode::Any),
        other => return Err(schema_error(path, format!("expected a schema object, got {other}"))),
    };

    match obj.get("type").and_then(Json::as_str) {
        Some("object") => object_from_json(obj, path),
        Some("array") => {
            let items = match obj.get("items") {
                Some(items) => node_from_json(items, &format!("{path}/items"))?,
                None => SchemaNode::Any,
            };
            Ok(SchemaNode::Array {
                items: Box::new(items),
            })
        }
        Some("integer") => {
            let exclusive_minimum = match obj.get("exclusiveMinimum") {
                None => None,
                Some(bound) => Some(bound.as_f64().ok_or_else(|| {
                    schema_error(
                        &format!("{path}/exclusiveMinimum"),
                        format!("expected a number, got {bound}"),
                    )
                })?),
            };
            Ok(SchemaNode::Integer { exclusive_minimum })
        }
        Some("string") => Ok(SchemaNode::String),
        _ => Ok(SchemaNode::Any),
    }
}

fn object_from_json(obj: &Map<String, Json>, path: &str) -> Result<SchemaNode> {
    let properties = match obj.get("properties") {
        None => Vec::new(),
        Some(Json::Object(props)) => props
            .iter()
            .map(|(key, child)| -> Result<(String, SchemaNode)> {
                let child = node_from_json(child, &format!("{path}/properties/{key}"))?;
                Ok((key.clone(), child))
            })
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(schema_error(
                &format!("{path}/properties"),
                format!("expected an object, got {other}"),
            ))
        }
    };

    let additional_properties = match obj.get("additionalProperties") {
        Some(Json::Bool(false)) => AdditionalProperties::RejectAll,
        Some(Json::Object(ap)) if ap.contains_key("anyOf") => AdditionalProperties::LintRuleShape,
        _ => AdditionalProperties::None,
    };

    Ok(SchemaNode::Object {
        properties,
        additional_properties,
    })
}

fn schema_error(path: &str, reason: String) -> RulesetError {
    RulesetError::Schema {
        path: path.to_string(),
        reason,
    }
}
