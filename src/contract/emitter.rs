//! Artifact emitter for compiled contracts.
//!
//! This module is a thin wrapper around the IR pipeline:
//! 1. Parse: OpenAPI JSON/YAML -> [`OpenApiDocument`]
//! 2. Extract: document -> [`ContractModel`]
//! 3. Emit: contract model -> emission records -> rendered source text
//!
//! The template receives plain serialized records; it never sees schema
//! nodes or assembles validator expressions itself. Generated type
//! declarations come from a separate type-generation collaborator that
//! shares the same output directory.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::contract::error::CompileError;
use crate::contract::ir::{ContractModel, build_contract, contract_records};
use crate::contract::spec::OpenApiDocument;

/// File name of the rendered operations module.
pub const OPERATIONS_FILENAME: &str = "operations.ts";

const OPERATIONS_TEMPLATE: &str = include_str!("../../templates/operations.ts.tera");

/// Parse an OpenAPI document from JSON or YAML text.
pub fn parse_document(text: &str) -> Result<OpenApiDocument, CompileError> {
    if text.trim_start().starts_with('{') {
        OpenApiDocument::from_json(text)
    } else {
        OpenApiDocument::from_yaml(text)
    }
}

/// Compile an OpenAPI document into the rendered operations module.
pub fn compile(document_text: &str) -> Result<String, CompileError> {
    let document = parse_document(document_text)?;
    let model = build_contract(&document)?;
    render(&model)
}

/// Render an already-built contract model through the operations template.
pub fn render(model: &ContractModel) -> Result<String, CompileError> {
    let mut context = tera::Context::new();
    context.insert("operations", &contract_records(model));
    context.insert("controllers", &model.controllers);
    Ok(tera::Tera::one_off(OPERATIONS_TEMPLATE, &context, false)?)
}

/// Compile an OpenAPI document and write the artifacts into `output_dir`.
pub fn compile_to_dir(document_text: &str, output_dir: &Path) -> Result<(), CompileError> {
    let rendered = compile(document_text)?;

    fs::create_dir_all(output_dir)?;
    let target = output_dir.join(OPERATIONS_FILENAME);
    fs::write(&target, &rendered)?;

    debug!(
        target = %target.display(),
        rendered_len = rendered.len(),
        "Contract artifacts written."
    );

    Ok(())
}
