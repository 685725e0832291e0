//! Error types for the admission webhooks.

use thiserror::Error;

/// Warnings returned alongside an allowed admission decision.
///
/// Ordered by detection. Warnings never cause rejection on their own; they
/// are displayed to the human or tool issuing the request.
pub type Warnings = Vec<String>;

/// Error type for admission gate evaluation
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// The submitted object is not the kind this gate handles, or is
    /// missing where an object is required
    #[error("expected an {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },

    /// The submitted object carries a payload that does not decode into
    /// the expected kind
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdmissionError {
    /// Build a TypeMismatch error for the given kinds
    pub fn type_mismatch(expected: impl Into<String>, received: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            received: received.into(),
        }
    }
}
