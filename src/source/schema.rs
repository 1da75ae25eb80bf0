//! Validation of a JSON data file against a JSON Schema file
//!
//! Used by the `addon-views-validate` binary to check release lists and
//! add-on documents against published schema files before they are fed to
//! a transformation run.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::source::error::{SchemaViolation, SourceError};

fn read_json(path: &Path) -> Result<Value, SourceError> {
    let content = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&content).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Check the document at `data_path` against the schema at `schema_path`
///
/// An unusable schema is reported as a [`SchemaViolation`] of the schema
/// file; every error in the document is collected into one violation of
/// the data file.
pub fn validate_with_schema(schema_path: &Path, data_path: &Path) -> Result<(), SourceError> {
    let schema = read_json(schema_path)?;
    let instance = read_json(data_path)?;

    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| SchemaViolation::new(schema_path, format!("invalid schema: {e}")))?;

    let errors: Vec<String> = validator
        .iter_errors(&instance)
        .map(|e| e.to_string())
        .collect();
    if !errors.is_empty() {
        return Err(SchemaViolation::new(data_path, errors.join("; ")).into());
    }

    debug!("{:?} conforms to {:?}", data_path, schema_path);
    Ok(())
}
