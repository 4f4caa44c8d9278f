//! OpenAPI contract compiler.
//!
//! This module turns a declarative API contract into executable validation
//! schemas and routing metadata:
//! - Validator IR derived per schema node (`ir::translate`)
//! - Per-operation metadata: normalized paths, partitioned parameter
//!   validators, response variants, controller grouping (`ir::extract`)
//! - Rendered source artifacts for the generated server glue (`emitter`)

mod emitter;
pub mod error;
pub mod ir;
pub mod spec;

pub use emitter::{OPERATIONS_FILENAME, compile, compile_to_dir, parse_document, render};
