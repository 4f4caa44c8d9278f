//! Extraction from an OpenAPI document to the contract model.
//!
//! This module walks the document's path items, normalizes each operation
//! into an [`OperationDescriptor`], and accumulates the controller grouping.
//! Iteration follows document order throughout; it determines emitted
//! artifact ordering and is the authority for the request-body last-wins
//! rule in [`extract_operation`].

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::contract::error::CompileError;
use crate::contract::spec::{OpenApiDocument, Operation, Parameter};

use super::model::{
    ContractModel, ControllerGrouping, HttpMethod, OperationDescriptor, RequestBodyDescriptor,
    ResponseVariant,
};
use super::translate::{translate_parameter_group, translate_schema};

/// Rewrite `{name}`-style path template segments into the router's `:name`
/// parameter syntax. A path with no templated segments is returned unchanged.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut placeholder = String::new();
    let mut in_placeholder = false;

    for c in path.chars() {
        match c {
            '{' if !in_placeholder => {
                in_placeholder = true;
                placeholder.clear();
            }
            '}' if in_placeholder => {
                normalized.push(':');
                normalized.push_str(&placeholder);
                in_placeholder = false;
            }
            _ if in_placeholder => placeholder.push(c),
            _ => normalized.push(c),
        }
    }

    normalized
}

/// Normalize a tag into an identifier-form controller key: separator-split
/// camelCase with a lowercase head, an underscore prefix for names starting
/// with a digit.
pub fn controller_key(tag: &str) -> String {
    let mut key = String::new();
    for (i, part) in tag
        .split(['-', '.', ' ', '_'])
        .filter(|part| !part.is_empty())
        .enumerate()
    {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if i == 0 {
            key.extend(first.to_lowercase());
        } else {
            key.extend(first.to_uppercase());
        }
        key.push_str(chars.as_str());
    }

    if key.is_empty() {
        return "_untagged".to_string();
    }
    if key.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        key.insert(0, '_');
    }
    key
}

/// Merge path-level parameters with operation-level ones. An operation-level
/// parameter overrides a path-level parameter with the same name.
fn merge_parameters<'a>(
    path_params: Option<&'a Vec<Parameter>>,
    op: &'a Operation,
) -> Vec<&'a Parameter> {
    let mut merged: Vec<&Parameter> = Vec::new();
    if let Some(shared) = path_params {
        merged.extend(shared.iter());
    }
    if let Some(own) = &op.parameters {
        for parameter in own {
            merged.retain(|existing| existing.name != parameter.name);
            merged.push(parameter);
        }
    }
    merged
}

/// Extract one (path, method) pair into an operation descriptor.
///
/// Operations lacking an `operationId` are skipped entirely (`Ok(None)`),
/// not treated as errors.
pub fn extract_operation(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    path_params: Option<&Vec<Parameter>>,
) -> Result<Option<OperationDescriptor>, CompileError> {
    let Some(id) = &op.operation_id else {
        return Ok(None);
    };

    // Request body: iterate the declared content types in document order and
    // unconditionally overwrite, so the last one encountered wins. This is an
    // ordering-dependent tie-break inherited from the system this compiler
    // replaces; see DESIGN.md before "fixing" it.
    let mut request_body = None;
    if let Some(body) = &op.request_body
        && let Some(content) = &body.content
    {
        for (content_type, media) in content {
            let validator = media
                .schema
                .as_ref()
                .map(|schema| translate_schema(schema, false))
                .transpose()?;
            request_body = Some(RequestBodyDescriptor {
                content_type: content_type.clone(),
                validator,
            });
        }
    }

    // Partition parameters by location; unrecognized locations (e.g. cookie)
    // are ignored.
    let merged = merge_parameters(path_params, op);
    let by_location = |location: &str| -> Vec<&Parameter> {
        merged
            .iter()
            .copied()
            .filter(|p| p.location == location)
            .collect()
    };
    let header_params = translate_parameter_group(&by_location("header"))?;
    let path_params = translate_parameter_group(&by_location("path"))?;
    let query_params = translate_parameter_group(&by_location("query"))?;

    // Responses: one variant per declared (status, content type); a status
    // with no content emits exactly one content-less variant.
    let mut response_variants = Vec::new();
    for (status, response) in &op.responses {
        let has_headers = response.headers.is_some();
        match &response.content {
            Some(content) if !content.is_empty() => {
                for content_type in content.keys() {
                    response_variants.push(ResponseVariant {
                        status: status.clone(),
                        content_type: Some(content_type.clone()),
                        has_body: true,
                        has_headers,
                    });
                }
            }
            _ => response_variants.push(ResponseVariant {
                status: status.clone(),
                content_type: None,
                has_body: false,
                has_headers,
            }),
        }
    }

    let controller = op
        .tags
        .as_ref()
        .and_then(|tags| tags.first())
        .map(|tag| controller_key(tag));

    Ok(Some(OperationDescriptor {
        id: id.clone(),
        normalized_path: normalize_path(path),
        method,
        request_body,
        header_params,
        path_params,
        query_params,
        response_variants,
        controller,
    }))
}

/// Build the contract model for a whole document.
///
/// Path items are visited in document order, methods within a path item in
/// the fixed get, post, put, patch, delete order. The pass is single-shot:
/// any translation error aborts the build with no partial model.
pub fn build_contract(document: &OpenApiDocument) -> Result<ContractModel, CompileError> {
    let mut operations = Vec::new();
    let mut controllers: ControllerGrouping = IndexMap::new();
    let mut seen_ids = HashSet::new();

    for (path, item) in &document.paths {
        let path_params = item.parameters.as_ref();
        for (method, op) in [
            (HttpMethod::Get, item.get.as_ref()),
            (HttpMethod::Post, item.post.as_ref()),
            (HttpMethod::Put, item.put.as_ref()),
            (HttpMethod::Patch, item.patch.as_ref()),
            (HttpMethod::Delete, item.delete.as_ref()),
        ] {
            let Some(op) = op else {
                continue;
            };
            let Some(descriptor) = extract_operation(path, method, op, path_params)? else {
                continue;
            };

            if !seen_ids.insert(descriptor.id.clone()) {
                return Err(CompileError::DuplicateOperationId {
                    id: descriptor.id.clone(),
                });
            }

            if let Some(controller) = &descriptor.controller {
                controllers
                    .entry(controller.clone())
                    .or_default()
                    .push(descriptor.id.clone());
            }

            operations.push(descriptor);
        }
    }

    Ok(ContractModel {
        operations,
        controllers,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::contract::ir::validator::ValidatorIR;

    fn operation_from_json(json: &str) -> Operation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/pets/{petId}/photos/{photoId}"),
            "/pets/:petId/photos/:photoId"
        );
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_controller_key() {
        assert_eq!(controller_key("Pets"), "pets");
        assert_eq!(controller_key("pet-store"), "petStore");
        assert_eq!(controller_key("admin users"), "adminUsers");
        assert_eq!(controller_key("123numbers"), "_123numbers");
    }

    #[test]
    fn test_operation_without_id_is_skipped() {
        let op = operation_from_json(r#"{"responses": {"200": {"description": "OK"}}}"#);
        let extracted = extract_operation("/pets", HttpMethod::Get, &op, None).unwrap();
        assert!(extracted.is_none());
    }

    #[test]
    fn test_last_declared_content_type_wins() {
        let op = operation_from_json(
            r#"{
              "operationId": "createPet",
              "requestBody": {
                "content": {
                  "application/json": {"schema": {"type": "object", "properties": {}}},
                  "application/xml": {"schema": {"type": "string"}}
                }
              },
              "responses": {}
            }"#,
        );
        let descriptor = extract_operation("/pets", HttpMethod::Post, &op, None)
            .unwrap()
            .unwrap();
        let body = descriptor.request_body.unwrap();
        assert_eq!(body.content_type, "application/xml");
        assert_eq!(body.validator, Some(ValidatorIR::String.optional()));
    }

    #[test]
    fn test_parameters_partitioned_by_location() {
        let op = operation_from_json(
            r#"{
              "operationId": "listPets",
              "parameters": [
                {"name": "X-Api-Key", "in": "header", "required": true, "schema": {"type": "string"}},
                {"name": "limit", "in": "query", "schema": {"type": "integer"}},
                {"name": "session", "in": "cookie", "required": true, "schema": {"type": "string"}}
              ],
              "responses": {}
            }"#,
        );
        let descriptor = extract_operation("/pets", HttpMethod::Get, &op, None)
            .unwrap()
            .unwrap();

        let header = descriptor.header_params.unwrap();
        let ValidatorIR::Object { fields } = &header else {
            panic!("expected object validator, got {header:?}");
        };
        assert!(fields.contains_key("X-Api-Key"));
        assert!(!fields.contains_key("session"), "cookie params are ignored");

        assert!(descriptor.path_params.is_none());
        assert!(descriptor.query_params.is_some());
    }

    #[test]
    fn test_operation_parameters_override_path_level() {
        let shared: Vec<Parameter> = serde_json::from_str(
            r#"[{"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}]"#,
        )
        .unwrap();
        let op = operation_from_json(
            r#"{
              "operationId": "getPet",
              "parameters": [
                {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
              ],
              "responses": {}
            }"#,
        );
        let descriptor = extract_operation("/pets/{petId}", HttpMethod::Get, &op, Some(&shared))
            .unwrap()
            .unwrap();
        let path = descriptor.path_params.unwrap();
        let ValidatorIR::Object { fields } = &path else {
            panic!("expected object validator, got {path:?}");
        };
        assert_eq!(fields["petId"], ValidatorIR::String);
    }

    #[test]
    fn test_content_less_status_emits_one_variant() {
        let op = operation_from_json(
            r#"{
              "operationId": "deletePet",
              "responses": {
                "204": {"description": "Deleted"},
                "200": {
                  "description": "OK",
                  "headers": {"X-Request-Id": {"schema": {"type": "string"}}},
                  "content": {
                    "application/json": {"schema": {"type": "boolean"}},
                    "text/plain": {"schema": {"type": "string"}}
                  }
                }
              }
            }"#,
        );
        let descriptor = extract_operation("/pets/{petId}", HttpMethod::Delete, &op, None)
            .unwrap()
            .unwrap();
        assert_eq!(
            descriptor.response_variants,
            vec![
                ResponseVariant {
                    status: "204".to_string(),
                    content_type: None,
                    has_body: false,
                    has_headers: false,
                },
                ResponseVariant {
                    status: "200".to_string(),
                    content_type: Some("application/json".to_string()),
                    has_body: true,
                    has_headers: true,
                },
                ResponseVariant {
                    status: "200".to_string(),
                    content_type: Some("text/plain".to_string()),
                    has_body: true,
                    has_headers: true,
                },
            ]
        );
    }

    #[test]
    fn test_first_tag_only_controls_grouping() {
        let document = OpenApiDocument::from_json(
            r#"{
              "paths": {
                "/pets": {
                  "get": {
                    "operationId": "listPets",
                    "tags": ["Pets", "Animals"],
                    "responses": {}
                  },
                  "post": {
                    "operationId": "createPet",
                    "tags": ["Pets"],
                    "responses": {}
                  }
                },
                "/untagged": {
                  "get": {"operationId": "untaggedOp", "responses": {}}
                }
              }
            }"#,
        )
        .unwrap();
        let model = build_contract(&document).unwrap();

        assert_eq!(model.controllers.len(), 1);
        assert_eq!(model.controllers["pets"], vec!["listPets", "createPet"]);
        assert!(
            model
                .controllers
                .values()
                .all(|ids| !ids.contains(&"untaggedOp".to_string()))
        );
    }

    #[test]
    fn test_duplicate_operation_id_fails_fast() {
        let document = OpenApiDocument::from_json(
            r#"{
              "paths": {
                "/a": {"get": {"operationId": "sameId", "responses": {}}},
                "/b": {"get": {"operationId": "sameId", "responses": {}}}
              }
            }"#,
        )
        .unwrap();
        let err = build_contract(&document).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DuplicateOperationId { id } if id == "sameId"
        ));
    }

    #[test]
    fn test_unsupported_schema_aborts_the_build() {
        let document = OpenApiDocument::from_json(
            r#"{
              "paths": {
                "/ok": {"get": {"operationId": "fine", "responses": {}}},
                "/bad": {
                  "post": {
                    "operationId": "broken",
                    "requestBody": {
                      "content": {"application/json": {"schema": {"type": "null"}}}
                    },
                    "responses": {}
                  }
                }
              }
            }"#,
        )
        .unwrap();
        let err = build_contract(&document).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedSchemaType { .. }));
    }

    #[test]
    fn test_get_pet_end_to_end() {
        let op = operation_from_json(
            r#"{
              "operationId": "getPet",
              "parameters": [
                {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
              ],
              "responses": {
                "200": {
                  "description": "OK",
                  "content": {"application/json": {"schema": {"type": "object", "properties": {}}}}
                }
              }
            }"#,
        );
        let descriptor = extract_operation("/pets/{id}", HttpMethod::Get, &op, None)
            .unwrap()
            .unwrap();

        assert_eq!(descriptor.id, "getPet");
        assert_eq!(descriptor.normalized_path, "/pets/:id");
        assert_eq!(descriptor.method, HttpMethod::Get);
        let path = descriptor.path_params.unwrap();
        let ValidatorIR::Object { fields } = &path else {
            panic!("expected object validator, got {path:?}");
        };
        assert_eq!(fields["id"], ValidatorIR::String);
        assert_eq!(
            descriptor.response_variants,
            vec![ResponseVariant {
                status: "200".to_string(),
                content_type: Some("application/json".to_string()),
                has_body: true,
                has_headers: false,
            }]
        );
    }
}
