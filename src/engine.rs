//! Validation engine.
//!
//! A small interpreter that runs a [`ValidatorIR`] expression against a JSON
//! value. On success it returns the validated value with undeclared object
//! fields stripped; on failure it reports the path of the first offending
//! field. The engine holds no state, so validations are safe to run
//! concurrently and re-derivation of validators per request stays cheap to
//! reason about.

use serde_json::Value;
use thiserror::Error;

use crate::contract::ir::ValidatorIR;

/// A per-request validation failure, surfaced unmodified to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationFailure {
    /// JSONPath-style location of the offending field, rooted at `$`.
    pub path: String,
    pub message: String,
}

fn fail(path: &str, message: impl Into<String>) -> ValidationFailure {
    ValidationFailure {
        path: path.to_string(),
        message: message.into(),
    }
}

/// Validate `value` against `validator`, returning the validated value.
pub fn validate(validator: &ValidatorIR, value: &Value) -> Result<Value, ValidationFailure> {
    validate_at("$", validator, value)
}

fn validate_at(
    path: &str,
    validator: &ValidatorIR,
    value: &Value,
) -> Result<Value, ValidationFailure> {
    match validator {
        ValidatorIR::Optional { inner } => {
            if value.is_null() {
                Ok(Value::Null)
            } else {
                validate_at(path, inner, value)
            }
        }
        ValidatorIR::String => match value.as_str() {
            Some(s) => Ok(Value::String(s.to_string())),
            None => Err(fail(path, "expected a string")),
        },
        ValidatorIR::Number => {
            if value.is_number() {
                Ok(value.clone())
            } else {
                Err(fail(path, "expected a number"))
            }
        }
        ValidatorIR::Integer => {
            if value.is_i64() || value.is_u64() {
                Ok(value.clone())
            } else if value.as_f64().is_some_and(|n| n.fract() == 0.0) {
                Ok(value.clone())
            } else if value.is_number() {
                Err(fail(path, "expected a number without decimals"))
            } else {
                Err(fail(path, "expected a number"))
            }
        }
        ValidatorIR::Boolean => match value.as_bool() {
            Some(b) => Ok(Value::Bool(b)),
            None => Err(fail(path, "expected a boolean")),
        },
        ValidatorIR::Enum { base, values } => {
            let validated = validate_at(path, base, value)?;
            let is_member = validated.as_str().is_some_and(|s| values.iter().any(|v| v == s));
            if is_member {
                Ok(validated)
            } else {
                Err(fail(
                    path,
                    format!("expected one of: {}", values.join(", ")),
                ))
            }
        }
        ValidatorIR::Object { fields } => {
            let Some(map) = value.as_object() else {
                return Err(fail(path, "expected an object"));
            };
            let mut validated = serde_json::Map::new();
            for (name, field) in fields {
                let field_path = format!("{path}.{name}");
                match map.get(name) {
                    Some(field_value) => {
                        validated.insert(
                            name.clone(),
                            validate_at(&field_path, field, field_value)?,
                        );
                    }
                    None if field.is_optional() => {}
                    None => return Err(fail(&field_path, "required field is missing")),
                }
            }
            Ok(Value::Object(validated))
        }
        ValidatorIR::Array { items } => {
            let Some(elements) = value.as_array() else {
                return Err(fail(path, "expected an array"));
            };
            let mut validated = Vec::with_capacity(elements.len());
            for (i, element) in elements.iter().enumerate() {
                let element_path = format!("{path}[{i}]");
                validated.push(validate_at(&element_path, items, element)?);
            }
            Ok(Value::Array(validated))
        }
    }
}
