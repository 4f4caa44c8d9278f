//! Serialization of the contract model into emission records.
//!
//! Emission is a pure serialization step: validator expressions are derived
//! from the IR here and nowhere else, so validation-logic correctness stays
//! decoupled from text templating. The records in this module are the data
//! contract handed to the templating collaborator.

use serde::Serialize;

use super::model::{ContractModel, OperationDescriptor, ResponseVariant};
use super::validator::ValidatorIR;

/// Serialize a validator expression into builder-style source text for the
/// generated validation module.
pub fn validator_source(validator: &ValidatorIR) -> String {
    match validator {
        ValidatorIR::String => "vine.string()".to_string(),
        ValidatorIR::Number => "vine.number()".to_string(),
        ValidatorIR::Integer => "vine.number().withoutDecimals()".to_string(),
        ValidatorIR::Boolean => "vine.boolean()".to_string(),
        ValidatorIR::Object { fields } => {
            if fields.is_empty() {
                return "vine.object({})".to_string();
            }
            let mut source = String::from("vine.object({ ");
            for (i, (name, field)) in fields.iter().enumerate() {
                if i > 0 {
                    source.push_str(", ");
                }
                source.push_str(&format!("'{name}': {}", validator_source(field)));
            }
            source.push_str(" })");
            source
        }
        ValidatorIR::Array { items } => format!("vine.array({})", validator_source(items)),
        ValidatorIR::Enum { base, values } => {
            let list = serde_json::to_string(values).unwrap_or_default();
            format!("{}.enum({list})", validator_source(base))
        }
        ValidatorIR::Optional { inner } => format!("{}.optional()", validator_source(inner)),
    }
}

/// One operation as handed to the template.
#[derive(Debug, Serialize)]
pub struct OperationRecord {
    pub id: String,
    pub normalized_path: String,
    pub method: &'static str,
    /// Generated type path of the winning request-body content type.
    pub request_body_type: Option<String>,
    pub request_body_validator: Option<String>,
    /// Generated type path of the operation's parameters interface.
    pub parameters_type: Option<String>,
    pub header_params_validator: Option<String>,
    pub path_params_validator: Option<String>,
    pub query_params_validator: Option<String>,
    /// Union of the declared response shapes, as generated type source.
    pub responses_type: Option<String>,
}

/// Flatten an operation descriptor into its emission record.
pub fn operation_record(descriptor: &OperationDescriptor) -> OperationRecord {
    let id = &descriptor.id;

    let request_body_type = descriptor
        .request_body
        .as_ref()
        .map(|body| format!("operations['{id}']['requestBody']['{}']", body.content_type));
    let request_body_validator = descriptor
        .request_body
        .as_ref()
        .and_then(|body| body.validator.as_ref())
        .map(validator_source);

    let has_params = descriptor.header_params.is_some()
        || descriptor.path_params.is_some()
        || descriptor.query_params.is_some();
    let parameters_type = has_params.then(|| format!("operations['{id}']['parameters']"));

    let responses_type = if descriptor.response_variants.is_empty() {
        None
    } else {
        let variants: Vec<String> = descriptor
            .response_variants
            .iter()
            .map(|variant| response_variant_type(id, variant))
            .collect();
        Some(variants.join(" | "))
    };

    OperationRecord {
        id: id.clone(),
        normalized_path: descriptor.normalized_path.clone(),
        method: descriptor.method.as_str(),
        request_body_type,
        request_body_validator,
        parameters_type,
        header_params_validator: descriptor.header_params.as_ref().map(validator_source),
        path_params_validator: descriptor.path_params.as_ref().map(validator_source),
        query_params_validator: descriptor.query_params.as_ref().map(validator_source),
        responses_type,
    }
}

fn response_variant_type(id: &str, variant: &ResponseVariant) -> String {
    let headers = if variant.has_headers {
        format!(
            ", headers: operations['{id}']['responses']['{}']['headers']",
            variant.status
        )
    } else {
        String::new()
    };
    match &variant.content_type {
        Some(content_type) => format!(
            "{{ status: '{}', mime: '{content_type}'{headers}, body: operations['{id}']['responses']['{}']['content']['{content_type}'] }}",
            variant.status, variant.status
        ),
        None => format!("{{ status: '{}'{headers} }}", variant.status),
    }
}

/// Flatten the whole contract model into emission records.
pub fn contract_records(model: &ContractModel) -> Vec<OperationRecord> {
    model.operations.iter().map(operation_record).collect()
}
