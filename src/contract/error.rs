//! Error taxonomy for the contract compiler.

use thiserror::Error;

/// Fatal errors raised while compiling an OpenAPI document into a contract
/// model. None of these are recovered locally; a single failure aborts the
/// whole compile with no partial model.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A schema node used a type outside the supported set
    /// (string, number, integer, boolean, object, array).
    #[error("unsupported schema type: {found}")]
    UnsupportedSchemaType { found: String },

    /// Two operations declared the same `operationId`.
    #[error("duplicate operationId '{id}': each operation must have a unique identifier")]
    DuplicateOperationId { id: String },

    /// The input document could not be deserialized.
    #[error("{0}")]
    Parse(String),

    /// Rendering the contract artifacts through the template failed.
    #[error("failed to render contract artifacts: {0}")]
    Template(#[from] tera::Error),

    /// Writing the contract artifacts to the output directory failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Build an `UnsupportedSchemaType` error from an optional
    /// `type` field, naming absent types explicitly.
    pub fn unsupported_type(found: Option<&str>) -> Self {
        CompileError::UnsupportedSchemaType {
            found: found.unwrap_or("(unspecified)").to_string(),
        }
    }
}
