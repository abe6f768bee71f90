use thiserror::Error;

use crate::models::form::FieldId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("form field {0} must be a string")]
    NonStringField(String),
}

/// The first form field that failed validation.
///
/// The collector stops at the first failure in field-table order so the
/// caller can point the user at exactly one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .field.label(), .reason)]
pub struct ValidationError {
    pub field: FieldId,
    pub reason: ValidationReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("this field is required")]
    Missing,

    #[error("{0}")]
    Malformed(String),
}
