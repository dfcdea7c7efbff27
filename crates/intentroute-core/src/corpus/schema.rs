//! JSON Schema validation for corpus files.
//!
//! Corpus files are validated against `schema/corpus.schema.json` before they
//! are deserialized, so a typo in a label is reported with its location
//! instead of as a generic parse failure.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded corpus schema (loaded at compile time).
const CORPUS_SCHEMA_JSON: &str = include_str!("../../schema/corpus.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(CORPUS_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a corpus JSON value against the schema.
///
/// Returns every violation found, each with its instance path.
pub fn validate_corpus_schema(corpus_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(corpus_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
