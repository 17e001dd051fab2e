//! Codec error types

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Line codec errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    // Encoding errors
    #[error("Key field '{field}' contains a line break")]
    KeyContainsNewline { field: String },

    #[error("Field '{field}' contains reserved token '{token}'")]
    ReservedToken { field: String, token: &'static str },

    #[error("Field '{0}' has no value")]
    MissingValue(String),

    #[error("Field '{field}' expects {expected}, got {actual}")]
    WrongKind {
        field: String,
        expected: &'static str,
        actual: String,
    },

    // Decoding errors
    #[error("Field '{field}': cannot parse '{text}' as {expected}")]
    InvalidValue {
        field: String,
        text: String,
        expected: &'static str,
    },

    #[error("Field '{field}': '{text}' is neither a symbol nor a valid ordinal")]
    UnknownSymbol { field: String, text: String },

    #[error("Field '{0}' is missing its closing tag")]
    UnterminatedField(String),
}

impl CodecError {
    /// Name of the field the error refers to
    pub fn field(&self) -> &str {
        match self {
            CodecError::KeyContainsNewline { field }
            | CodecError::ReservedToken { field, .. }
            | CodecError::WrongKind { field, .. }
            | CodecError::InvalidValue { field, .. }
            | CodecError::UnknownSymbol { field, .. } => field,
            CodecError::MissingValue(field) | CodecError::UnterminatedField(field) => field,
        }
    }
}
