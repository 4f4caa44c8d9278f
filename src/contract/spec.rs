//! OpenAPI document structs for serde deserialization.
//!
//! This module defines the minimal subset of an OpenAPI 3.x document that the
//! contract compiler consumes. The document is expected to be fully
//! reference-resolved before it reaches this crate; `$ref` nodes are not
//! represented. Mappings use [`IndexMap`] so that document order survives
//! deserialization — iteration order is load-bearing for body content-type
//! selection and artifact ordering.

// Allow unused fields that are part of the OpenAPI spec for completeness
#![allow(dead_code)]

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::CompileError;

/// Root OpenAPI document.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    /// Path-level parameters shared by all operations.
    pub parameters: Option<Vec<Parameter>>,
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    pub parameters: Option<Vec<Parameter>>,
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// A parameter (query, path, or header).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A response definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub content: Option<IndexMap<String, MediaType>>,
    /// Response headers. Only presence is recorded by the compiler; the
    /// header schemas themselves are a codegen-layer concern.
    pub headers: Option<IndexMap<String, serde_json::Value>>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in OpenAPI.
///
/// Only the `object`, `array`, `string`, `number`, `integer`, and `boolean`
/// types are supported by the translator; everything else is rejected at
/// compile time.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<String>,

    /// Properties for object types.
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values for string types (order-preserving).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
}

impl OpenApiDocument {
    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        serde_json::from_str(json)
            .map_err(|e| CompileError::Parse(format!("failed to parse OpenAPI document: {e}")))
    }

    /// Parse an OpenAPI document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CompileError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| CompileError::Parse(format!("failed to parse OpenAPI document: {e}")))
    }
}
