//! Contract-level IR for extracted operations.
//!
//! This module defines the records produced by extraction:
//! - [`OperationDescriptor`]: one normalized (path, method) operation
//! - [`ContractModel`]: the ordered operation list plus controller grouping
//!
//! Descriptors are created once during extraction, never mutated afterward,
//! and consumed read-only by emission and dispatch.

use indexmap::IndexMap;
use serde::Serialize;

use super::validator::ValidatorIR;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// The method name as it appears in an OpenAPI path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

/// The request body retained for an operation.
///
/// Only a single declared content type is honored per operation: when a body
/// declares several, the last one encountered in document order wins. This
/// mirrors the observed behavior of the system this compiler replaces and is
/// a known limitation, not a merge policy.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBodyDescriptor {
    /// The winning content type (e.g., `application/json`).
    pub content_type: String,
    /// Validator for the body schema, if the content declared one.
    pub validator: Option<ValidatorIR>,
}

/// One declared (status, content type) response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseVariant {
    pub status: String,
    /// `None` for a content-less status (e.g., 204).
    pub content_type: Option<String>,
    pub has_body: bool,
    /// Whether the status declares response headers. The header schema is
    /// referenced by a generated type path at the codegen layer and is not
    /// re-derived here.
    pub has_headers: bool,
}

/// A single extracted operation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationDescriptor {
    /// The `operationId`, unique within the document.
    pub id: String,
    /// Path with `{name}` templates rewritten to the router's `:name` form.
    pub normalized_path: String,
    pub method: HttpMethod,
    pub request_body: Option<RequestBodyDescriptor>,
    pub header_params: Option<ValidatorIR>,
    pub path_params: Option<ValidatorIR>,
    pub query_params: Option<ValidatorIR>,
    pub response_variants: Vec<ResponseVariant>,
    /// Identifier-normalized first tag, if the operation declared any.
    pub controller: Option<String>,
}

/// Mapping from a derived controller name to the operationIds sharing that
/// tag, in document encounter order.
pub type ControllerGrouping = IndexMap<String, Vec<String>>;

/// The aggregate output of extraction and the sole input to emission.
#[derive(Debug, Serialize)]
pub struct ContractModel {
    pub operations: Vec<OperationDescriptor>,
    pub controllers: ControllerGrouping,
}
