//! Validation-schema intermediate representation.
//!
//! A [`ValidatorIR`] is the translated form of an OpenAPI schema node: a
//! composable expression tree mirroring the validation engine's capability
//! set. It is built fresh on every translation call and has no identity
//! beyond the expression it represents, which keeps translation pure and
//! lets the runtime re-derive validators per request without shared state.

use indexmap::IndexMap;
use serde::Serialize;

/// A composable validation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorIR {
    /// Accepts any string.
    String,
    /// Accepts any number, decimals permitted.
    Number,
    /// Accepts numbers with no fractional part.
    Integer,
    /// Accepts booleans.
    Boolean,
    /// Accepts objects, validating each declared field.
    Object { fields: IndexMap<String, ValidatorIR> },
    /// Accepts arrays, validating every element.
    Array { items: Box<ValidatorIR> },
    /// Constrains the wrapped validator to an exact value set. The value
    /// order is preserved for error messages only; membership is unordered.
    Enum {
        base: Box<ValidatorIR>,
        values: Vec<String>,
    },
    /// Marks the wrapped validator as optional: the field may be absent
    /// from the input without failing validation.
    Optional { inner: Box<ValidatorIR> },
}

impl ValidatorIR {
    /// Wrap this validator in an optional modifier.
    pub fn optional(self) -> Self {
        ValidatorIR::Optional {
            inner: Box::new(self),
        }
    }

    /// Whether this validator tolerates an absent field.
    pub fn is_optional(&self) -> bool {
        matches!(self, ValidatorIR::Optional { .. })
    }
}
