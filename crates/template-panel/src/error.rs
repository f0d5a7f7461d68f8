//! Error types for panel building.

use std::fmt;
use template_dom::DomError;
use template_fields::FieldError;

/// Result type for panel building.
pub type PanelResult<T> = Result<T, PanelError>;

/// An error raised while a panel is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelError {
    /// The error message.
    pub message: String,
    /// The error code.
    pub code: PanelErrorCode,
}

impl PanelError {
    /// Create a new panel error.
    pub fn new(message: impl Into<String>, code: PanelErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Create an unbalanced fields error.
    pub fn unbalanced(message: impl Into<String>) -> Self {
        Self::new(message, PanelErrorCode::UnbalancedFields)
    }

    /// Create a recursive template error.
    pub fn recursive_template(name: &str) -> Self {
        Self::new(
            format!("Template '{}' renders itself", name),
            PanelErrorCode::RecursiveTemplate,
        )
    }
}

impl From<FieldError> for PanelError {
    fn from(err: FieldError) -> Self {
        Self::new(err.message, PanelErrorCode::Field)
    }
}

impl From<DomError> for PanelError {
    fn from(err: DomError) -> Self {
        Self::new(err.message, PanelErrorCode::Dom)
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PanelError {}

/// Error codes for panel building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelErrorCode {
    /// `begin_field` and `end_field` calls do not pair up.
    UnbalancedFields,
    /// A view renders a template that is already being built.
    RecursiveTemplate,
    /// A field operation failed.
    Field,
    /// The document rejected an operation.
    Dom,
}

impl PanelErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnbalancedFields => "unbalanced-fields",
            Self::RecursiveTemplate => "recursive-template",
            Self::Field => "field",
            Self::Dom => "dom",
        }
    }
}

impl fmt::Display for PanelErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
