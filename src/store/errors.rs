//! Store error types
//!
//! Error codes:
//! - TAG_CONFIGURATION_ERROR (FATAL)
//! - TAG_TYPE_MISMATCH (REJECT)
//! - TAG_ENCODING_ERROR (REJECT)
//! - TAG_DECODE_ERROR (ERROR)
//! - TAG_STORE_IO_ERROR (ERROR)

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::Path;
use std::string::FromUtf8Error;

use crate::codec::CodecError;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected; the store file was not touched
    Reject,
    /// Operation failed
    Error,
    /// The store cannot be used as configured
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Path, key field or schema missing or invalid
    TagConfigurationError,
    /// Record or key does not match the configured schema
    TagTypeMismatch,
    /// Record cannot be encoded as a line
    TagEncodingError,
    /// Stored line cannot be decoded
    TagDecodeError,
    /// File I/O failure
    TagStoreIoError,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::TagConfigurationError => "TAG_CONFIGURATION_ERROR",
            StoreErrorCode::TagTypeMismatch => "TAG_TYPE_MISMATCH",
            StoreErrorCode::TagEncodingError => "TAG_ENCODING_ERROR",
            StoreErrorCode::TagDecodeError => "TAG_DECODE_ERROR",
            StoreErrorCode::TagStoreIoError => "TAG_STORE_IO_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::TagConfigurationError => Severity::Fatal,
            StoreErrorCode::TagTypeMismatch => Severity::Reject,
            StoreErrorCode::TagEncodingError => Severity::Reject,
            StoreErrorCode::TagDecodeError => Severity::Error,
            StoreErrorCode::TagStoreIoError => Severity::Error,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message, context and cause
#[derive(Debug)]
pub struct StoreError {
    /// Error code
    code: StoreErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying error if applicable
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::TagConfigurationError, message)
    }

    /// Create a type mismatch error against the named schema
    pub fn type_mismatch(schema_name: &str, reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::TagTypeMismatch, reason)
            .with_details(format!("schema: {}", schema_name))
    }

    /// Wrap a codec failure raised while encoding
    pub fn encoding(source: CodecError) -> Self {
        Self {
            code: StoreErrorCode::TagEncodingError,
            message: source.to_string(),
            details: Some(format!("field: {}", source.field())),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a codec failure raised while decoding the given line
    pub fn decode_at_line(path: &Path, line_number: usize, source: CodecError) -> Self {
        Self {
            code: StoreErrorCode::TagDecodeError,
            message: source.to_string(),
            details: Some(format!("file: {}, line: {}", path.display(), line_number)),
            source: Some(Box::new(source)),
        }
    }

    /// A stored line that is not valid UTF-8
    pub fn invalid_text_at_line(path: &Path, line_number: usize, source: FromUtf8Error) -> Self {
        Self {
            code: StoreErrorCode::TagDecodeError,
            message: format!("Line is not valid UTF-8: {}", source.utf8_error()),
            details: Some(format!("file: {}, line: {}", path.display(), line_number)),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::TagStoreIoError,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error with the file path as context
    pub fn io_error_at_path(action: &str, path: &Path, source: io::Error) -> Self {
        Self::io_error(format!("Failed to {}: {}", action, path.display()), source)
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the codec error behind an encoding or decode failure
    pub fn codec_error(&self) -> Option<&CodecError> {
        self.source.as_ref().and_then(|e| e.downcast_ref::<CodecError>())
    }

    /// Returns whether the store cannot be used as configured
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
