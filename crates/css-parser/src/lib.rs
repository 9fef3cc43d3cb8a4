//! CSS parser for typed-css-rs.
//!
//! This crate parses a stylesheet into the shallow AST the token locator
//! walks: rules with their class selectors, declarations, and at-rules
//! (including nested blocks such as `@media`). It also parses the CSS Modules
//! constructs layered on top of plain CSS:
//! - `@value` declarations and `@value … from "…"` imports
//! - `composes: … from "…"` declarations
//! - `@import` specifiers
//!
//! Parsing is strict: the first syntax error aborts with a [`ParseError`]
//! carrying the offending span. Consumers that need line/column information
//! convert through `source_map::LineIndex`.
//!
//! # Example
//!
//! ```
//! use css_parser::parse;
//!
//! let sheet = parse(".button { color: red }").unwrap();
//! assert_eq!(sheet.items.len(), 1);
//! ```

mod ast;
mod error;
mod icss;
mod lexer;
mod parser;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use icss::{import_specifier, parse_at_value, parse_composes, AtValue, AtValueImport, Composes, ComposesSource};
pub use lexer::{Lexer, Token, TokenKind};
pub use source_map::Span;

/// Parses CSS source into a stylesheet AST.
pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    parser::Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let sheet = parse("").unwrap();
        assert!(sheet.items.is_empty());
    }

    #[test]
    fn test_parse_whitespace_and_comments_only() {
        let sheet = parse("  /* nothing here */\n\n").unwrap();
        assert!(sheet.items.is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse(".broken {").is_err());
    }
}
