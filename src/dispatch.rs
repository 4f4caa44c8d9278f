//! Runtime dispatch adapter.
//!
//! Bridges compiled operations onto an axum [`Router`]. Each registered
//! route re-derives its validators from the operation's live OpenAPI node on
//! every request — translation is pure, so this trades a little
//! recomputation for complete statelessness under concurrent load. A request
//! moves through three phases: validating, invoking, completed; a validation
//! failure short-circuits to a rejection before the bound handler runs.
//!
//! Axum's `{name}` path syntax coincides with OpenAPI path templates, so
//! operations are mounted under their raw template paths; the `:name`
//! normalized form remains the emission-facing router syntax.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::RawPathParams;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing;
use axum::{Json, Router};
use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::contract::error::CompileError;
use crate::contract::ir::{ValidatorIR, translate_parameter_group, translate_schema};
use crate::contract::spec::{Operation, Parameter};
use crate::engine;

/// The single request-body content type honored at dispatch time.
const REQUEST_BODY_CONTENT_TYPE: &str = "application/json";

/// Errors raised while binding operations to the router.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The operation used an HTTP method outside the five supported ones.
    #[error("unsupported method: {method}")]
    UnsupportedMethod { method: String },

    /// The operation node carried no `operationId` to register under.
    #[error("operation at '{path}' has no operationId to register under")]
    MissingOperationId { path: String },
}

/// The validated input handed to a bound handler.
#[derive(Debug, Clone)]
pub struct HandlerInput {
    /// Validated path parameters.
    pub params: Value,
    /// Validated request body (`Null` when the operation declares none).
    pub body: Value,
}

/// A bound operation handler. The returned value becomes the response
/// payload through the host framework's normal result handling.
pub type OperationHandler = Arc<dyn Fn(HandlerInput) -> BoxFuture<'static, Value> + Send + Sync>;

/// Adapt an async function into an [`OperationHandler`].
pub fn handler_fn<F, Fut>(f: F) -> OperationHandler
where
    F: Fn(HandlerInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Value> + Send + 'static,
{
    Arc::new(move |input| -> BoxFuture<'static, Value> { Box::pin(f(input)) })
}

/// One operation to mount: the raw template path, the HTTP method as it
/// appears in the document, the operation's live OpenAPI node, and the
/// handler to invoke once validation passes.
pub struct OperationRoute {
    pub path: String,
    pub method: String,
    pub operation: Operation,
    pub handler: OperationHandler,
}

impl fmt::Debug for OperationRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRoute")
            .field("path", &self.path)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Where an operation ended up after registration.
#[derive(Debug, Clone)]
pub struct RouteHandle {
    pub path: String,
    pub method: String,
}

/// An axum router extension that registers operations by their OpenAPI
/// nodes and keeps a handle per operationId.
pub struct ContractRouter {
    router: Router,
    routes: IndexMap<String, RouteHandle>,
}

impl fmt::Debug for ContractRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractRouter")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl Default for ContractRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractRouter {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            routes: IndexMap::new(),
        }
    }

    /// Register one operation. Fails for methods outside get, post, put,
    /// patch, delete, and for operations without an `operationId`.
    pub fn openapi(mut self, route: OperationRoute) -> Result<Self, DispatchError> {
        let OperationRoute {
            path,
            method,
            operation,
            handler,
        } = route;

        let Some(id) = operation.operation_id.clone() else {
            return Err(DispatchError::MissingOperationId { path });
        };

        let operation = Arc::new(operation);
        let endpoint = move |params: RawPathParams, body: Bytes| {
            let operation = Arc::clone(&operation);
            let handler = Arc::clone(&handler);
            async move { dispatch_request(&operation, &handler, params, body).await }
        };

        let method_router = match method.as_str() {
            "get" => routing::get(endpoint),
            "post" => routing::post(endpoint),
            "put" => routing::put(endpoint),
            "patch" => routing::patch(endpoint),
            "delete" => routing::delete(endpoint),
            other => {
                return Err(DispatchError::UnsupportedMethod {
                    method: other.to_string(),
                });
            }
        };

        debug!(operation = %id, path = %path, method = %method, "Registering operation route.");
        self.router = self.router.route(&path, method_router);
        self.routes.insert(id, RouteHandle { path, method });
        Ok(self)
    }

    /// Look up the registered route for an operationId.
    pub fn route(&self, operation_id: &str) -> Option<&RouteHandle> {
        self.routes.get(operation_id)
    }

    /// Consume the adapter and hand the finished router to the host.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Derive the request-body validator for the fixed dispatch content type.
fn request_body_validator(operation: &Operation) -> Result<Option<ValidatorIR>, CompileError> {
    let Some(body) = &operation.request_body else {
        return Ok(None);
    };
    let Some(content) = &body.content else {
        return Ok(None);
    };
    let Some(media) = content.get(REQUEST_BODY_CONTENT_TYPE) else {
        return Ok(None);
    };
    let Some(schema) = &media.schema else {
        return Ok(None);
    };
    Ok(Some(translate_schema(schema, true)?))
}

/// Derive one merged validator over all of the operation's parameters,
/// locations undifferentiated. This is deliberately simpler than the
/// compiler's three-way split.
fn merged_params_validator(operation: &Operation) -> Result<Option<ValidatorIR>, CompileError> {
    let parameters: Vec<&Parameter> = operation.parameters.iter().flatten().collect();
    translate_parameter_group(&parameters)
}

async fn dispatch_request(
    operation: &Operation,
    handler: &OperationHandler,
    params: RawPathParams,
    body: Bytes,
) -> Response {
    // Validating
    let raw_body = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(err) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid JSON body: {err}"),
                );
            }
        }
    };

    let validated_body = match request_body_validator(operation) {
        Ok(Some(validator)) => match engine::validate(&validator, &raw_body) {
            Ok(value) => value,
            Err(failure) => return rejected(&failure),
        },
        Ok(None) => Value::Null,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };

    let raw_params = Value::Object(
        params
            .iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect(),
    );
    let validated_params = match merged_params_validator(operation) {
        Ok(Some(validator)) => match engine::validate(&validator, &raw_params) {
            Ok(value) => value,
            Err(failure) => return rejected(&failure),
        },
        Ok(None) => raw_params,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };

    // Invoking
    let input = HandlerInput {
        params: validated_params,
        body: validated_body,
    };
    let output = handler(input).await;

    // Completed
    Json(output).into_response()
}

/// Surface a validation failure to the host framework unmodified.
fn rejected(failure: &engine::ValidationFailure) -> Response {
    debug!(error = %failure, "Request rejected during validation.");
    error_response(StatusCode::UNPROCESSABLE_ENTITY, &failure.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn operation_from_json(json: &str) -> Operation {
        serde_json::from_str(json).unwrap()
    }

    fn noop_handler() -> OperationHandler {
        handler_fn(|_input| async { Value::Null })
    }

    #[test]
    fn test_unsupported_method_is_rejected_at_registration() {
        let err = ContractRouter::new()
            .openapi(OperationRoute {
                path: "/pets".to_string(),
                method: "options".to_string(),
                operation: operation_from_json(r#"{"operationId": "preflight", "responses": {}}"#),
                handler: noop_handler(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "unsupported method: options");
    }

    #[test]
    fn test_operation_without_id_is_rejected_at_registration() {
        let err = ContractRouter::new()
            .openapi(OperationRoute {
                path: "/pets".to_string(),
                method: "get".to_string(),
                operation: operation_from_json(r#"{"responses": {}}"#),
                handler: noop_handler(),
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingOperationId { .. }));
    }

    #[test]
    fn test_registration_records_a_route_handle() {
        let router = ContractRouter::new()
            .openapi(OperationRoute {
                path: "/pets/{id}".to_string(),
                method: "get".to_string(),
                operation: operation_from_json(r#"{"operationId": "getPet", "responses": {}}"#),
                handler: noop_handler(),
            })
            .unwrap();
        let handle = router.route("getPet").unwrap();
        assert_eq!(handle.path, "/pets/{id}");
        assert_eq!(handle.method, "get");
    }

    #[test]
    fn test_body_validator_uses_the_fixed_content_type() {
        let operation = operation_from_json(
            r#"{
              "operationId": "createPet",
              "requestBody": {
                "content": {
                  "application/xml": {"schema": {"type": "string"}},
                  "application/json": {"schema": {"type": "object", "properties": {}}}
                }
              },
              "responses": {}
            }"#,
        );
        let validator = request_body_validator(&operation).unwrap().unwrap();
        assert!(matches!(validator, ValidatorIR::Object { .. }));
    }

    #[test]
    fn test_merged_params_validator_ignores_locations() {
        let operation = operation_from_json(
            r#"{
              "operationId": "getPet",
              "parameters": [
                {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}},
                {"name": "verbose", "in": "query", "schema": {"type": "boolean"}}
              ],
              "responses": {}
            }"#,
        );
        let validator = merged_params_validator(&operation).unwrap().unwrap();
        let ValidatorIR::Object { fields } = &validator else {
            panic!("expected object validator, got {validator:?}");
        };
        assert!(fields.contains_key("id"));
        assert!(fields.contains_key("verbose"));

        assert!(
            engine::validate(&validator, &json!({"id": "42"})).is_ok(),
            "absent optional query param must not reject"
        );
        assert!(engine::validate(&validator, &json!({})).is_err());
    }
}
