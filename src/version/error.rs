use thiserror::Error;

/// Malformed version string or version object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected 2 or 3 dot-separated components, got {count} in {input:?}")]
    ComponentCount { input: String, count: usize },

    #[error("component {component:?} of {input:?} is not a non-negative integer")]
    NotNumeric { input: String, component: String },

    #[error("version object is missing required field {0:?}")]
    MissingField(&'static str),

    #[error("version field {field:?} has invalid value {value}")]
    InvalidField { field: &'static str, value: String },
}
