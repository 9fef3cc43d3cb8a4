//! Parse error types.

use source_map::Span;
use thiserror::Error;

/// An error that occurred during parsing.
///
/// Parsing is all-or-nothing: the first error aborts the parse.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },

    /// An unexpected end of file was encountered.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },

    /// A malformed selector was found.
    #[error("invalid selector: {message}")]
    InvalidSelector {
        /// A description of the problem.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextSize;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: "'{'".to_string(),
                found: "';'".to_string(),
            },
            Span::new(TextSize::from(4), TextSize::from(5)),
        );
        assert_eq!(error.to_string(), "unexpected token: expected '{', found ';'");
    }
}
