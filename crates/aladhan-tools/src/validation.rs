//! Argument validation against the advertised input schema.
//!
//! Runs before any upstream request so that bad input surfaces as an "invalid arguments" reply
//! rather than a failed HTTP call.

use crate::error::{Result, ToolError};
use serde_json::{Map, Value};
use std::fmt;

/// One reason an argument object was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    UnknownParameter {
        name: String,
        suggestion: Option<String>,
    },
    MissingRequired(String),
    Constraint {
        instance_path: String,
        message: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParameter {
                name,
                suggestion: Some(s),
            } => write!(f, "unknown parameter '{name}' (did you mean '{s}'?)"),
            Self::UnknownParameter {
                name,
                suggestion: None,
            } => write!(f, "unknown parameter '{name}'"),
            Self::MissingRequired(name) => write!(f, "missing required parameter '{name}'"),
            Self::Constraint {
                instance_path,
                message,
            } if instance_path.is_empty() => f.write_str(message),
            Self::Constraint {
                instance_path,
                message,
            } => write!(f, "{instance_path}: {message}"),
        }
    }
}

/// Collect every violation of `schema` by `args`.
#[must_use]
pub fn violations(schema: &Value, args: &Map<String, Value>) -> Vec<Violation> {
    let props = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect();
    let valid_params: Vec<&str> = props.keys().map(String::as_str).collect();

    let mut out = Vec::new();

    for k in args.keys() {
        if props.contains_key(k) {
            continue;
        }
        out.push(Violation::UnknownParameter {
            name: k.clone(),
            suggestion: find_similar_strings(k, &valid_params).into_iter().next(),
        });
    }

    for r in required {
        if !args.contains_key(r) {
            out.push(Violation::MissingRequired(r.to_string()));
        }
    }

    let instance = Value::Object(args.clone());
    match jsonschema::validator_for(schema) {
        Ok(compiled) => {
            for e in compiled.iter_errors(&instance) {
                // Reported above with a friendlier shape.
                if matches!(
                    e.kind(),
                    jsonschema::error::ValidationErrorKind::Required { .. }
                        | jsonschema::error::ValidationErrorKind::AdditionalProperties { .. }
                ) {
                    continue;
                }
                out.push(Violation::Constraint {
                    instance_path: e.instance_path().to_string(),
                    message: e.to_string(),
                });
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "input schema failed to compile; skipping constraint checks");
        }
    }

    out
}

/// Validate `args` against `schema`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] listing every violation, joined with `"; "`.
pub fn validate_arguments(schema: &Value, args: &Map<String, Value>) -> Result<()> {
    let found = violations(schema, args);
    if found.is_empty() {
        return Ok(());
    }
    let msg = found
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(ToolError::InvalidArguments(msg))
}

fn find_similar_strings(unknown: &str, known: &[&str]) -> Vec<String> {
    let mut candidates: Vec<(f64, String)> = Vec::new();
    for k in known {
        let score = strsim::jaro(unknown, k);
        if score > 0.7 {
            candidates.push((score, (*k).to_string()));
        }
    }
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    candidates.into_iter().map(|(_, s)| s).collect()
}
