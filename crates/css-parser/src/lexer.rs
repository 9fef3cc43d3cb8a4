//! CSS tokenizer using logos.

use logos::Logos;
use source_map::Span;
use text_size::TextSize;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for CSS.
///
/// The lexer is deliberately coarse: values and at-rule preludes are
/// re-assembled from raw source text by span, so anything the parser does not
/// structurally care about lexes as [`TokenKind::Delim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum TokenKind {
    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// An at-keyword such as `@import` or `@value`.
    #[regex(r"@[-a-zA-Z_][-a-zA-Z0-9_]*")]
    AtKeyword,

    /// A quoted string, including the quotes.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    /// An identifier, including custom-property names.
    #[regex(r"-{0,2}[a-zA-Z_][-a-zA-Z0-9_]*")]
    Ident,

    /// A hash token such as `#fff` or an id selector.
    #[regex(r"#[-a-zA-Z0-9_]+")]
    Hash,

    /// A numeric token with an optional unit.
    #[regex(r"[0-9]+(\.[0-9]+)?[a-zA-Z%]*")]
    Number,

    /// Any other single character.
    #[regex(r".", priority = 0)]
    Delim,

    /// End of input. Synthesised by the parser, never produced by logos.
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::String => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Hash => "hash",
            TokenKind::Number => "number",
            TokenKind::Delim => "delimiter",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Tokenizes CSS source text.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer over the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let kind = self.inner.next()?;
        let range = self.inner.span();
        let span = Span::new(
            TextSize::from(range.start as u32),
            TextSize::from(range.end as u32),
        );
        // Unlexable bytes degrade to delimiters; the parser decides whether
        // they matter.
        let kind = kind.unwrap_or(TokenKind::Delim);
        Some(Token { kind, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_rule() {
        assert_eq!(
            kinds(".btn { color: red }"),
            vec![
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_at_import_with_string() {
        assert_eq!(
            kinds("@import \"./a.css\";"),
            vec![TokenKind::AtKeyword, TokenKind::String, TokenKind::Semicolon]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(kinds("/* x */ .a /**/ {}"), kinds(".a {}"));
    }

    #[test]
    fn test_custom_property_ident() {
        assert_eq!(
            kinds("--main-color"),
            vec![TokenKind::Ident]
        );
    }

    #[test]
    fn test_spans_are_contiguous_for_class() {
        let tokens: Vec<Token> = Lexer::new(".myClass").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].span.end, tokens[1].span.start);
    }

    #[test]
    fn test_unlexable_byte_is_delim() {
        assert_eq!(kinds("§"), vec![TokenKind::Delim]);
    }
}
