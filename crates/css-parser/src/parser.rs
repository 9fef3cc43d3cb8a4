//! Recursive descent parser for CSS.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use smol_str::SmolStr;
use source_map::Span;
use text_size::TextSize;

/// At-rules whose block contains declarations rather than nested rules.
fn has_declaration_block(name: &str) -> bool {
    matches!(
        name,
        "font-face" | "page" | "counter-style" | "property" | "viewport" | "font-palette-values"
    )
}

/// The CSS parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The token stream.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// EOF token for when we're past the end.
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::empty(TextSize::from(source.len() as u32)),
        };
        Self {
            source,
            tokens,
            pos: 0,
            eof_token,
        }
    }

    /// Parses the source into a stylesheet.
    pub fn parse(mut self) -> Result<Stylesheet, ParseError> {
        let items = self.parse_items()?;
        if !self.check(TokenKind::Eof) {
            return Err(self.unexpected("a rule or at-rule"));
        }
        Ok(Stylesheet { items })
    }

    // === Token helpers ===

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    /// Returns the text of the given token.
    fn text(&self, token: &Token) -> &'src str {
        token.span.text(self.source)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Builds an error for the current token.
    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.name().to_string(),
            }
        };
        ParseError::new(kind, token.span)
    }

    // === Parsing methods ===

    /// Parses items until a closing brace or end of input.
    fn parse_items(&mut self) -> Result<Vec<Item>, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Eof | TokenKind::RBrace => break,
                TokenKind::AtKeyword => items.push(Item::AtRule(self.parse_at_rule()?)),
                _ => items.push(Item::Rule(self.parse_rule()?)),
            }
        }
        Ok(items)
    }

    /// Parses an at-rule, including a nested block when present.
    fn parse_at_rule(&mut self) -> Result<AtRule, ParseError> {
        let at = *self.current();
        let name = SmolStr::new(&self.text(&at)[1..]);
        self.advance();

        // Prelude: everything up to the block or terminating semicolon.
        let mut params_span = Span::empty(self.current().span.start);
        let mut saw_params = false;
        loop {
            match self.current().kind {
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Eof => break,
                _ => {
                    let span = self.current().span;
                    params_span = if saw_params { params_span.cover(span) } else { span };
                    saw_params = true;
                    self.advance();
                }
            }
        }
        let params = params_span.text(self.source).trim().to_string();

        match self.current().kind {
            TokenKind::Semicolon => {
                let end = self.current().span.end;
                self.advance();
                Ok(AtRule {
                    name,
                    params,
                    params_span,
                    items: None,
                    declarations: Vec::new(),
                    span: Span::new(at.span.start, end),
                })
            }
            TokenKind::LBrace => {
                self.advance();
                // `@font-face` and friends hold declarations directly;
                // grouping at-rules hold nested rules.
                let (items, declarations) = if has_declaration_block(&name) {
                    (None, self.parse_declarations()?)
                } else {
                    (Some(self.parse_items()?), Vec::new())
                };
                if !self.check(TokenKind::RBrace) {
                    return Err(self.unexpected("'}'"));
                }
                let end = self.current().span.end;
                self.advance();
                Ok(AtRule {
                    name,
                    params,
                    params_span,
                    items,
                    declarations,
                    span: Span::new(at.span.start, end),
                })
            }
            // An unterminated at-rule at end of input closes implicitly.
            _ => Ok(AtRule {
                name,
                params,
                params_span,
                items: None,
                declarations: Vec::new(),
                span: Span::new(at.span.start, params_span.end),
            }),
        }
    }

    /// Parses a style rule: a selector list and its declaration block.
    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let start = self.current().span.start;

        let mut selectors = vec![self.parse_selector()?];
        while self.check(TokenKind::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }
        if !self.check(TokenKind::LBrace) {
            return Err(self.unexpected("'{'"));
        }
        self.advance();

        let declarations = self.parse_declarations()?;
        if !self.check(TokenKind::RBrace) {
            return Err(self.unexpected("'}'"));
        }
        let end = self.current().span.end;
        self.advance();

        Ok(Rule {
            selectors,
            declarations,
            span: Span::new(start, end),
        })
    }

    /// Parses one selector out of a comma-separated list.
    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let start = self.current().span.start;
        let mut end = start;
        let mut parts = Vec::new();
        let mut saw_any = false;

        loop {
            match self.current().kind {
                TokenKind::Comma | TokenKind::LBrace => break,
                TokenKind::Eof | TokenKind::Semicolon | TokenKind::RBrace => {
                    return Err(self.unexpected("'{'"));
                }
                _ => {
                    saw_any = true;
                    end = self.parse_selector_part(&mut parts)?;
                }
            }
        }

        if !saw_any {
            return Err(ParseError::new(
                ParseErrorKind::InvalidSelector {
                    message: "empty selector".to_string(),
                },
                Span::empty(start),
            ));
        }
        Ok(Selector {
            parts,
            span: Span::new(start, end),
        })
    }

    /// Parses a single selector part, pushing scoping-relevant parts and
    /// consuming everything else. Returns the end offset of what was
    /// consumed.
    fn parse_selector_part(&mut self, parts: &mut Vec<SelectorPart>) -> Result<TextSize, ParseError> {
        match self.current().kind {
            TokenKind::Dot => self.parse_class(parts),
            TokenKind::Colon => self.parse_pseudo(parts),
            // Element names, ids, attributes, combinators: positionally
            // irrelevant for token extraction.
            _ => {
                let end = self.current().span.end;
                self.advance();
                Ok(end)
            }
        }
    }

    /// Parses `.name` into a class selector part.
    fn parse_class(&mut self, parts: &mut Vec<SelectorPart>) -> Result<TextSize, ParseError> {
        let dot = *self.current();
        self.advance();
        let ident = *self.current();
        // The name must follow the dot with no intervening whitespace.
        if ident.kind != TokenKind::Ident || ident.span.start != dot.span.end {
            return Err(ParseError::new(
                ParseErrorKind::InvalidSelector {
                    message: "expected class name after '.'".to_string(),
                },
                dot.span,
            ));
        }
        let name = SmolStr::new(self.text(&ident));
        self.advance();
        parts.push(SelectorPart::Class(ClassSelector {
            name,
            span: Span::new(dot.span.start, ident.span.end),
        }));
        Ok(ident.span.end)
    }

    /// Parses a pseudo-class or pseudo-element, recursing into parenthesised
    /// arguments so class selectors inside `:global(…)`, `:not(…)` and
    /// friends are observed.
    fn parse_pseudo(&mut self, parts: &mut Vec<SelectorPart>) -> Result<TextSize, ParseError> {
        let colon = *self.current();
        self.advance();

        // Pseudo-elements (`::before`) carry a second colon.
        if self.check(TokenKind::Colon) {
            self.advance();
        }
        let ident = *self.current();
        if ident.kind != TokenKind::Ident {
            return Err(ParseError::new(
                ParseErrorKind::InvalidSelector {
                    message: "expected pseudo-class name after ':'".to_string(),
                },
                colon.span,
            ));
        }
        let name = SmolStr::new(self.text(&ident));
        self.advance();

        let lparen = *self.current();
        if lparen.kind == TokenKind::LParen && lparen.span.start == ident.span.end {
            self.advance();
            let mut args = Vec::new();
            let mut end = lparen.span.end;
            loop {
                match self.current().kind {
                    TokenKind::RParen => {
                        end = self.current().span.end;
                        self.advance();
                        break;
                    }
                    TokenKind::Eof => return Err(self.unexpected("')'")),
                    // Selector-list arguments may be comma-separated; the
                    // comma carries no scoping information.
                    TokenKind::Comma => self.advance(),
                    _ => {
                        self.parse_selector_part(&mut args)?;
                    }
                }
            }
            parts.push(SelectorPart::Pseudo {
                name,
                args: Some(args),
                span: Span::new(colon.span.start, end),
            });
            Ok(end)
        } else {
            let span = Span::new(colon.span.start, ident.span.end);
            parts.push(SelectorPart::Pseudo {
                name,
                args: None,
                span,
            });
            Ok(ident.span.end)
        }
    }

    /// Parses the declarations of a rule block.
    fn parse_declarations(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Ident => declarations.push(self.parse_declaration()?),
                _ => return Err(self.unexpected("a declaration")),
            }
        }
        Ok(declarations)
    }

    /// Parses a single `property: value` declaration.
    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let prop_token = *self.current();
        let property = SmolStr::new(self.text(&prop_token));
        self.advance();

        if !self.check(TokenKind::Colon) {
            return Err(self.unexpected("':'"));
        }
        self.advance();

        let mut value_span = Span::empty(self.current().span.start);
        let mut saw_value = false;
        loop {
            match self.current().kind {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::LBrace => return Err(self.unexpected("';'")),
                _ => {
                    let span = self.current().span;
                    value_span = if saw_value { value_span.cover(span) } else { span };
                    saw_value = true;
                    self.advance();
                }
            }
        }
        let value = value_span.text(self.source).trim().to_string();

        Ok(Declaration {
            property,
            value,
            value_span,
            span: Span::new(prop_token.span.start, value_span.end),
        })
    }
}
