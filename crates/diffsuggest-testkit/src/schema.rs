//! JSON schema validators for diffsuggest DTOs.
//!
//! Schemas are generated from the types with schemars, the same way
//! `cargo xtask schema` writes them to disk.

use diffsuggest_types::{Diagnostic, DiagnosticResult, RunnerConfig};
use jsonschema::JSONSchema;
use schemars::JsonSchema;

/// Error type for schema validation failures.
#[derive(Debug)]
pub struct SchemaValidationError {
    /// The validation errors.
    pub errors: Vec<String>,
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for SchemaValidationError {}

fn compile<T: JsonSchema>() -> JSONSchema {
    let schema = serde_json::to_value(schemars::schema_for!(T))
        .expect("generated schema should serialize to JSON");
    JSONSchema::compile(&schema).expect("generated schema should compile")
}

/// Compile the Diagnostic schema (one rdjsonl line).
pub fn diagnostic_schema() -> JSONSchema {
    compile::<Diagnostic>()
}

/// Compile the DiagnosticResult schema (the rdjson envelope).
pub fn diagnostic_result_schema() -> JSONSchema {
    compile::<DiagnosticResult>()
}

/// Compile the RunnerConfig schema.
pub fn runner_config_schema() -> JSONSchema {
    compile::<RunnerConfig>()
}

/// Validate a Diagnostic against its JSON schema.
pub fn validate_diagnostic(diagnostic: &Diagnostic) -> Result<(), SchemaValidationError> {
    let json = serde_json::to_value(diagnostic).expect("Diagnostic should serialize to JSON");
    validate_diagnostic_json(&json)
}

/// Validate any JSON value against the Diagnostic schema.
pub fn validate_diagnostic_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    validate_with_schema(&diagnostic_schema(), json)
}

/// Validate any JSON value against the DiagnosticResult schema.
pub fn validate_diagnostic_result_json(
    json: &serde_json::Value,
) -> Result<(), SchemaValidationError> {
    validate_with_schema(&diagnostic_result_schema(), json)
}

/// Validate any JSON value against the RunnerConfig schema.
pub fn validate_runner_config_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    validate_with_schema(&runner_config_schema(), json)
}

fn validate_with_schema(
    schema: &JSONSchema,
    json: &serde_json::Value,
) -> Result<(), SchemaValidationError> {
    match schema.validate(json) {
        Ok(()) => Ok(()),
        Err(errors) => Err(SchemaValidationError {
            errors: errors.map(|e| e.to_string()).collect(),
        }),
    }
}
