//! Model errors

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while loading questionnaire or response documents
#[derive(Debug, Error)]
pub enum ModelError {
    /// The document is not valid FHIR JSON for the expected resource shape
    #[error("Invalid FHIR JSON: {0}")]
    Json(#[from] serde_json::Error),
}
