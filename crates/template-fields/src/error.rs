//! Error types for field operations.

use std::fmt;
use template_dom::DomError;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// An error raised by a field operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The error message.
    pub message: String,
    /// The error code.
    pub code: FieldErrorCode,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(message: impl Into<String>, code: FieldErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Create an unknown field error.
    pub fn unknown_field(id: impl fmt::Display) -> Self {
        Self::new(
            format!("Unknown field: {}", id),
            FieldErrorCode::UnknownField,
        )
    }
}

impl From<DomError> for FieldError {
    fn from(err: DomError) -> Self {
        Self::new(err.message, FieldErrorCode::Dom)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FieldError {}

/// Error codes for field operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorCode {
    /// The field id does not belong to the panel, or was removed.
    UnknownField,
    /// The document rejected an operation.
    Dom,
}

impl FieldErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownField => "unknown-field",
            Self::Dom => "dom",
        }
    }
}

impl fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
