//! Error types for document operations.

use std::fmt;

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;

/// An error raised by a [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomError {
    /// The error message.
    pub message: String,
    /// The error code.
    pub code: DomErrorCode,
}

impl DomError {
    /// Create a new document error.
    pub fn new(message: impl Into<String>, code: DomErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Create an invalid markup error.
    pub fn invalid_markup(message: impl fmt::Display) -> Self {
        Self::new(
            format!("Invalid markup: {}", message),
            DomErrorCode::InvalidMarkup,
        )
    }

    /// Create a not-a-child error.
    pub fn not_a_child() -> Self {
        Self::new(
            "The reference node is not a child of this node",
            DomErrorCode::NotAChild,
        )
    }

    /// Create a hierarchy error.
    pub fn hierarchy(message: impl Into<String>) -> Self {
        Self::new(message, DomErrorCode::Hierarchy)
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomError {}

/// Error codes for document operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomErrorCode {
    /// Markup that could not be parsed.
    InvalidMarkup,
    /// A node expected to be a child was not.
    NotAChild,
    /// Insertion that would break the tree (into a text node, into itself).
    Hierarchy,
}

impl DomErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidMarkup => "invalid-markup",
            Self::NotAChild => "not-a-child",
            Self::Hierarchy => "hierarchy",
        }
    }
}

impl fmt::Display for DomErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
