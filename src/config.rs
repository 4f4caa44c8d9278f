//! Project configuration for the contract compiler.
//!
//! Configuration lives in an `oasgate.toml` at the project root. A missing
//! file is not an error; every key has a default.

use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name expected at the project root.
pub const CONFIG_FILENAME: &str = "oasgate.toml";

const DEFAULT_SPEC_PATH: &str = "resources/openapi/specs.yaml";
const DEFAULT_OUTPUT_PATH: &str = "generated/contract";

/// Resolved contract configuration.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Path of the OpenAPI document, relative to the project root.
    pub spec_path: PathBuf,
    /// Directory for generated artifacts, relative to the project root.
    /// Shared with the type-generation step so routes, validators, and type
    /// declarations land together.
    pub output_path: PathBuf,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from(DEFAULT_SPEC_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Read the contract configuration from `<project_root>/oasgate.toml`.
pub fn read_contract_config(project_root: &Path) -> Result<ContractConfig, String> {
    let config_path = project_root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(ContractConfig::default());
    }

    let contents = fs::read_to_string(&config_path)
        .map_err(|err| format!("Failed to read {}: {err}", config_path.display()))?;
    let value: toml::Value = contents
        .parse()
        .map_err(|err| format!("Failed to parse {}: {err}", config_path.display()))?;

    let contract = value.get("contract");
    let spec_path = contract
        .and_then(|c| c.get("spec-path"))
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_SPEC_PATH);
    let output_path = contract
        .and_then(|c| c.get("output-path"))
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_OUTPUT_PATH);

    Ok(ContractConfig {
        spec_path: PathBuf::from(spec_path),
        output_path: PathBuf::from(output_path),
    })
}
