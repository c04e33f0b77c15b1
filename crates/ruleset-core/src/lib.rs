//! # ruleset-core
//!
//! Parser and structural validator for **ruleset fragments**: small TOML-like
//! files such as `rulesets/ruff.toml` that each hold one slice of a larger
//! project configuration (e.g. `[rulesets.ruff]` or `[rulesets.eslint.rules]`).
//!
//! A fragment is parsed into a [`Document`] (an insertion-ordered [`Table`]) and
//! then checked against a [`SchemaNode`] tree loaded from a JSON schema. The
//! validator returns every violation it finds as a [`ValidationError`].
//!
//! ## Quick start
//!
//! ```rust
//! use ruleset_core::{parse, validate_document, SchemaNode};
//!
//! let schema = SchemaNode::from_json_str(r#"{
//!     "type": "object",
//!     "properties": {
//!         "rulesets": {
//!             "type": "object",
//!             "properties": {
//!                 "ruff": {
//!                     "type": "object",
//!                     "properties": {
//!                         "line-length": { "type": "integer", "exclusiveMinimum": 0 }
//!                     }
//!                 }
//!             }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let doc = parse("[rulesets.ruff]\nline-length = 100\n").unwrap();
//! assert!(validate_document(&doc, &schema).is_empty());
//!
//! let doc = parse("[rulesets.ruff]\nline-length = 0\n").unwrap();
//! let errors = validate_document(&doc, &schema);
//! assert_eq!(errors[0].to_string(), "rulesets.ruff.line-length: value must be > 0");
//! ```
//!
//! ## Modules
//!
//! - [`parser`] — fragment text → [`Document`]
//! - [`schema`] — JSON schema description → [`SchemaNode`]
//! - [`validator`] — [`Value`] + [`SchemaNode`] → list of [`ValidationError`]
//! - [`types`] — [`Value`] and [`Table`]
//! - [`error`] — Error types for parse and schema-load failures

pub mod error;
pub mod parser;
pub mod schema;
pub mod types;
pub mod validator;

pub use error::RulesetError;
pub use parser::parse;
pub use schema::{AdditionalProperties, SchemaNode};
pub use types::{Document, Kind, Table, Value};
pub use validator::{validate, validate_at, validate_document, ValidationError};
