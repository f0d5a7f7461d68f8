//! Error types for XML parsing.

use std::fmt;

/// Result type for XML operations.
pub type XmlResult<T> = Result<T, XmlError>;

/// An error that occurred while parsing XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    /// The error message.
    pub message: String,
    /// 1-based line of the offending token.
    pub line: u32,
    /// 1-based column of the offending token.
    pub column: u32,
    /// The error code.
    pub code: XmlErrorCode,
}

impl XmlError {
    /// Create a new XML error.
    pub fn new(message: impl Into<String>, line: u32, column: u32, code: XmlErrorCode) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            code,
        }
    }

    /// Create an error at a byte offset of `text`.
    pub fn at(text: &str, offset: usize, message: impl Into<String>, code: XmlErrorCode) -> Self {
        let (line, column) = line_column(text, offset);
        Self::new(message, line, column, code)
    }

    /// Wrap a tokenizer error.
    pub fn syntax(err: xmlparser::Error) -> Self {
        let pos = err.pos();
        Self::new(err.to_string(), pos.row, pos.col, XmlErrorCode::Syntax)
    }
}

fn line_column(text: &str, offset: usize) -> (u32, u32) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |idx| before[idx + 1..].chars().count())
        + 1;
    (line as u32, column as u32)
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

impl std::error::Error for XmlError {}

/// Error codes for XML parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlErrorCode {
    /// Malformed markup rejected by the tokenizer.
    Syntax,
    /// Close tag that does not match the open element.
    MismatchedTag,
    /// Element still open at the end of input.
    UnclosedElement,
    /// Prefix used without an `xmlns` declaration in scope.
    UnboundPrefix,
    /// Unknown or malformed entity reference.
    InvalidEntity,
    /// Document without a root element.
    MissingRoot,
}

impl XmlErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::MismatchedTag => "mismatched-tag",
            Self::UnclosedElement => "unclosed-element",
            Self::UnboundPrefix => "unbound-prefix",
            Self::InvalidEntity => "invalid-entity",
            Self::MissingRoot => "missing-root",
        }
    }
}

impl fmt::Display for XmlErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
    }
}
