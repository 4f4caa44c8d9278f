//! Translation from OpenAPI schema nodes to validator IR.
//!
//! Translation is pure and deterministic: equal input (by structure) yields
//! equal output (by structure), and no external state is read. Because the
//! input tree is assumed fully dereferenced, validators are re-derived
//! independently at every reference site; shared source nodes simply produce
//! structurally equal expressions.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::contract::error::CompileError;
use crate::contract::spec::{Parameter, Schema};

use super::validator::ValidatorIR;

/// Translate a single schema node into a validator.
///
/// `required` governs the post-processing step: a non-required schema is
/// wrapped in an optional modifier so the field may be absent from the input
/// without failing validation. Required fields are never wrapped.
pub fn translate_schema(schema: &Schema, required: bool) -> Result<ValidatorIR, CompileError> {
    let base = match schema.schema_type.as_deref() {
        Some("string") => {
            let validator = ValidatorIR::String;
            match &schema.enum_values {
                Some(values) => ValidatorIR::Enum {
                    base: Box::new(validator),
                    values: values.clone(),
                },
                None => validator,
            }
        }
        Some("number") => ValidatorIR::Number,
        Some("integer") => ValidatorIR::Integer,
        Some("boolean") => ValidatorIR::Boolean,
        Some("object") => {
            let required_set: HashSet<&String> = schema.required.iter().flatten().collect();
            let mut fields = IndexMap::new();
            if let Some(properties) = &schema.properties {
                for (name, property) in properties {
                    let field = translate_schema(property, required_set.contains(name))?;
                    fields.insert(name.clone(), field);
                }
            }
            ValidatorIR::Object { fields }
        }
        Some("array") => {
            let Some(items) = &schema.items else {
                return Err(CompileError::unsupported_type(None));
            };
            // Element presence is governed by array membership, not by the
            // outer required flag, so items always translate as non-required.
            ValidatorIR::Array {
                items: Box::new(translate_schema(items, false)?),
            }
        }
        other => return Err(CompileError::unsupported_type(other)),
    };

    if required { Ok(base) } else { Ok(base.optional()) }
}

/// Translate one location's worth of parameters into an object validator
/// keyed by parameter name.
///
/// The caller is expected to have already filtered the sequence to a single
/// HTTP location. An empty group yields `None` so the caller can omit the
/// location's validation step entirely rather than validating against an
/// empty object.
pub fn translate_parameter_group(
    parameters: &[&Parameter],
) -> Result<Option<ValidatorIR>, CompileError> {
    if parameters.is_empty() {
        return Ok(None);
    }

    let mut fields = IndexMap::new();
    for parameter in parameters {
        let field = match &parameter.schema {
            Some(schema) => translate_schema(schema, parameter.required)?,
            // Parameters without a schema default to a bare string validator.
            None if parameter.required => ValidatorIR::String,
            None => ValidatorIR::String.optional(),
        };
        fields.insert(parameter.name.clone(), field);
    }

    Ok(Some(ValidatorIR::Object { fields }))
}
