//! AST types for parsed stylesheets.
//!
//! The AST is shallow by design: selectors keep only the parts that matter
//! for CSS Modules scoping (class selectors and pseudo-classes), and
//! declaration values stay as raw text slices re-parsed on demand.

use smol_str::SmolStr;
use source_map::Span;

/// A parsed stylesheet.
#[derive(Debug, Default)]
pub struct Stylesheet {
    /// Top-level rules and at-rules in document order.
    pub items: Vec<Item>,
}

/// A top-level or nested stylesheet item.
#[derive(Debug)]
pub enum Item {
    /// A style rule: selectors and a declaration block.
    Rule(Rule),
    /// An at-rule, optionally with a nested block.
    AtRule(AtRule),
}

/// A style rule.
#[derive(Debug)]
pub struct Rule {
    /// Comma-separated selectors of the rule.
    pub selectors: Vec<Selector>,
    /// Declarations inside the block, in document order.
    pub declarations: Vec<Declaration>,
    /// The span of the whole rule, selector through closing brace.
    pub span: Span,
}

/// One selector out of a rule's comma-separated selector list.
#[derive(Debug)]
pub struct Selector {
    /// The scoping-relevant parts in source order.
    pub parts: Vec<SelectorPart>,
    /// The span of the selector text.
    pub span: Span,
}

/// A part of a selector the locator cares about.
///
/// Anything else (element names, ids, attributes, combinators) is dropped at
/// parse time.
#[derive(Debug)]
pub enum SelectorPart {
    /// A class selector: `.name`.
    Class(ClassSelector),
    /// A pseudo-class, with parenthesised inner parts when it has arguments:
    /// `:global(.a)`, `:not(.b)`, or a bare switch like `:global`.
    Pseudo {
        /// The pseudo-class name without the colon.
        name: SmolStr,
        /// Inner selector parts for the functional form, `None` for the bare
        /// form.
        args: Option<Vec<SelectorPart>>,
        /// The span from the colon to the end of the pseudo.
        span: Span,
    },
}

/// A class selector occurrence with its position.
#[derive(Debug, Clone)]
pub struct ClassSelector {
    /// The class name without the leading dot.
    pub name: SmolStr,
    /// The span covering the dot and the name.
    pub span: Span,
}

/// A declaration inside a rule block.
#[derive(Debug)]
pub struct Declaration {
    /// The property name.
    pub property: SmolStr,
    /// The raw value text, trimmed.
    pub value: String,
    /// The span of the value text.
    pub value_span: Span,
    /// The span of the whole declaration.
    pub span: Span,
}

/// An at-rule such as `@import`, `@value`, or `@media`.
#[derive(Debug)]
pub struct AtRule {
    /// The at-rule name without the `@`.
    pub name: SmolStr,
    /// The raw prelude text between the name and the block or semicolon,
    /// trimmed.
    pub params: String,
    /// The span of the prelude text.
    pub params_span: Span,
    /// Nested items for grouping at-rules (`@media`, `@supports`, …).
    pub items: Option<Vec<Item>>,
    /// Declarations for at-rules whose block holds them directly
    /// (`@font-face`, `@page`, …).
    pub declarations: Vec<Declaration>,
    /// The span of the whole at-rule.
    pub span: Span,
}

impl Rule {
    /// Iterates over every class selector occurrence in this rule's
    /// selectors, in source order, including occurrences nested inside
    /// pseudo-class arguments.
    pub fn class_selectors(&self) -> impl Iterator<Item = &ClassSelector> {
        fn walk<'a>(parts: &'a [SelectorPart], out: &mut Vec<&'a ClassSelector>) {
            for part in parts {
                match part {
                    SelectorPart::Class(class) => out.push(class),
                    SelectorPart::Pseudo { args: Some(inner), .. } => walk(inner, out),
                    SelectorPart::Pseudo { args: None, .. } => {}
                }
            }
        }
        let mut out = Vec::new();
        for selector in &self.selectors {
            walk(&selector.parts, &mut out);
        }
        out.into_iter()
    }
}
