//! Intermediate representation for the contract compiler.
//!
//! The pipeline through this module is:
//! 1. `translate`: OpenAPI schema nodes -> [`ValidatorIR`]
//! 2. `extract`: path items and operations -> [`OperationDescriptor`] /
//!    [`ContractModel`]
//! 3. `emit`: contract model -> emission records (validator source text and
//!    generated type paths)
//!
//! Everything here is pure; file I/O and template rendering live in the
//! emitter.

mod emit;
mod extract;
mod model;
mod translate;
mod validator;

pub use emit::{OperationRecord, contract_records, validator_source};
pub use extract::{build_contract, controller_key, extract_operation, normalize_path};
pub use model::{
    ContractModel, ControllerGrouping, HttpMethod, OperationDescriptor, RequestBodyDescriptor,
    ResponseVariant,
};
pub use translate::{translate_parameter_group, translate_schema};
pub use validator::ValidatorIR;
