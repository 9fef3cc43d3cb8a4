//! CSS Modules constructs layered on top of plain CSS.
//!
//! `@value` preludes, `composes` declaration values, and `@import` preludes
//! are re-parsed from their raw text here, mirroring how CSS Modules tooling
//! treats them as string patterns rather than part of the core grammar.
//! Every parser in this module returns `Option`: text that does not match the
//! pattern is simply not a CSS Modules construct, never a syntax error.

use smol_str::SmolStr;

/// A parsed `@value` prelude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtValue {
    /// `@value name: value;` declares a constant in this sheet.
    Declaration {
        /// The declared token name.
        name: SmolStr,
    },
    /// `@value a, b as c from "./other.css";` imports constants.
    Import {
        /// The specifier after `from`, unquoted.
        from: String,
        /// The imported bindings in source order.
        imports: Vec<AtValueImport>,
    },
}

/// One binding of an `@value … from` import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtValueImport {
    /// The name the source sheet exports.
    pub imported: SmolStr,
    /// The name bound in the importing sheet (differs under `as`).
    pub local: SmolStr,
}

/// A parsed `composes` declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composes {
    /// The composed class names.
    pub names: Vec<SmolStr>,
    /// Where the composed classes come from.
    pub source: ComposesSource,
}

/// The source of a `composes` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposesSource {
    /// A class in the same sheet.
    Local,
    /// A global class: `composes: x from global`.
    Global,
    /// Another sheet: `composes: x from "./other.css"`.
    File(String),
}

fn is_ident(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Strips matching single or double quotes, if present.
fn unquote(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if (first == '"' || first == '\'') && text.len() >= 2 && text.ends_with(first) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Splits `text` at its first standalone `from` keyword whose right-hand side
/// is a plausible import target, returning `(head, target)`.
fn split_from(text: &str) -> Option<(&str, &str)> {
    let mut search_start = 0;
    while let Some(found) = text[search_start..].find("from") {
        let idx = search_start + found;
        let before_ok = idx > 0 && text[..idx].ends_with(|c: char| c.is_whitespace());
        let after = &text[idx + 4..];
        let after_ok = after.starts_with(|c: char| c.is_whitespace());
        if before_ok && after_ok {
            let head = text[..idx].trim_end();
            let target = after.trim();
            if !head.is_empty() && !target.is_empty() {
                return Some((head, target));
            }
        }
        search_start = idx + 4;
    }
    None
}

/// Parses the prelude of an `@value` at-rule.
///
/// Returns `None` when the prelude matches neither the declaration nor the
/// import shape.
pub fn parse_at_value(params: &str) -> Option<AtValue> {
    let params = params.trim();
    if params.is_empty() {
        return None;
    }

    if let Some((head, target)) = split_from(params) {
        // `@value (a, b) from "x"` parenthesises the import list.
        let list = head
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(head);
        let mut imports = Vec::new();
        for entry in list.split(',') {
            let entry = entry.trim();
            let (imported, local) = match split_as(entry) {
                Some((name, alias)) => (name, alias),
                None => (entry, entry),
            };
            if !is_ident(imported) || !is_ident(local) {
                return None;
            }
            imports.push(AtValueImport {
                imported: SmolStr::new(imported),
                local: SmolStr::new(local),
            });
        }
        let from = match unquote(target) {
            Some(path) => path.to_string(),
            None if is_ident(target) => target.to_string(),
            None => return None,
        };
        return Some(AtValue::Import { from, imports });
    }

    // Declaration shape: a name, an optional colon, then a value.
    let name_end = params
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(params.len());
    let name = &params[..name_end];
    if name.is_empty() {
        return None;
    }
    let rest = params[name_end..].strip_prefix(':').unwrap_or(&params[name_end..]);
    if !rest.starts_with(|c: char| c.is_whitespace()) || rest.trim().is_empty() {
        return None;
    }
    Some(AtValue::Declaration {
        name: SmolStr::new(name),
    })
}

/// Splits an import entry on its `as` keyword.
fn split_as(entry: &str) -> Option<(&str, &str)> {
    let idx = entry.find(" as ")?;
    Some((entry[..idx].trim(), entry[idx + 4..].trim()))
}

/// Parses a `composes` declaration value.
///
/// Returns `None` for values that are not a valid `composes` list, including
/// `from` targets that are neither quoted nor the `global` keyword.
pub fn parse_composes(value: &str) -> Option<Composes> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (list, source) = match split_from(value) {
        Some((head, target)) => {
            let source = if target == "global" {
                ComposesSource::Global
            } else {
                ComposesSource::File(unquote(target)?.to_string())
            };
            (head, source)
        }
        None => (value, ComposesSource::Local),
    };

    let mut names = Vec::new();
    for name in list.split_whitespace() {
        if !is_ident(name) {
            return None;
        }
        names.push(SmolStr::new(name));
    }
    if names.is_empty() {
        return None;
    }
    Some(Composes { names, source })
}

/// Extracts the specifier from an `@import` prelude.
///
/// Handles `"path"`, `'path'`, `url(path)`, and `url("path")`, ignoring any
/// trailing media query. Returns `None` when the prelude has no recognisable
/// specifier.
pub fn import_specifier(params: &str) -> Option<String> {
    let params = params.trim();

    if let Some(rest) = strip_url_prefix(params) {
        let end = rest.find(')')?;
        let inner = rest[..end].trim();
        let path = unquote(inner).unwrap_or(inner);
        if path.is_empty() {
            return None;
        }
        return Some(path.to_string());
    }

    let first = params.chars().next()?;
    if first == '"' || first == '\'' {
        let rest = &params[1..];
        let end = rest.find(first)?;
        return Some(rest[..end].to_string());
    }
    None
}

fn strip_url_prefix(params: &str) -> Option<&str> {
    let rest = params
        .strip_prefix("url(")
        .or_else(|| params.strip_prefix("URL(").or_else(|| params.strip_prefix("Url(")))?;
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_declaration() {
        assert_eq!(
            parse_at_value("primary: #BF4040"),
            Some(AtValue::Declaration {
                name: SmolStr::new("primary")
            })
        );
    }

    #[test]
    fn test_value_declaration_without_colon() {
        assert_eq!(
            parse_at_value("blue #0c77f8"),
            Some(AtValue::Declaration {
                name: SmolStr::new("blue")
            })
        );
    }

    #[test]
    fn test_value_referencing_another_value() {
        assert_eq!(
            parse_at_value("v2: v1"),
            Some(AtValue::Declaration {
                name: SmolStr::new("v2")
            })
        );
    }

    #[test]
    fn test_value_without_body_is_rejected() {
        assert_eq!(parse_at_value("primary:"), None);
        assert_eq!(parse_at_value(""), None);
    }

    #[test]
    fn test_value_import() {
        let parsed = parse_at_value("a, b as c from \"./src.css\"").unwrap();
        assert_eq!(
            parsed,
            AtValue::Import {
                from: "./src.css".to_string(),
                imports: vec![
                    AtValueImport {
                        imported: SmolStr::new("a"),
                        local: SmolStr::new("a"),
                    },
                    AtValueImport {
                        imported: SmolStr::new("b"),
                        local: SmolStr::new("c"),
                    },
                ],
            }
        );
    }

    #[test]
    fn test_value_import_parenthesised() {
        let parsed = parse_at_value("(red, blue) from './colors.css'").unwrap();
        let AtValue::Import { from, imports } = parsed else {
            panic!("expected import");
        };
        assert_eq!(from, "./colors.css");
        assert_eq!(imports.len(), 2);
    }

    #[test]
    fn test_value_import_from_bare_module() {
        let parsed = parse_at_value("unit from spacing-module").unwrap();
        let AtValue::Import { from, .. } = parsed else {
            panic!("expected import");
        };
        assert_eq!(from, "spacing-module");
    }

    #[test]
    fn test_composes_local() {
        let parsed = parse_composes("base emphasized").unwrap();
        assert_eq!(parsed.names, vec!["base", "emphasized"]);
        assert_eq!(parsed.source, ComposesSource::Local);
    }

    #[test]
    fn test_composes_from_file() {
        let parsed = parse_composes("base from \"./base.css\"").unwrap();
        assert_eq!(parsed.names, vec!["base"]);
        assert_eq!(
            parsed.source,
            ComposesSource::File("./base.css".to_string())
        );
    }

    #[test]
    fn test_composes_from_global() {
        let parsed = parse_composes("header from global").unwrap();
        assert_eq!(parsed.source, ComposesSource::Global);
    }

    #[test]
    fn test_composes_unquoted_file_is_rejected() {
        assert_eq!(parse_composes("base from ./base.css"), None);
    }

    #[test]
    fn test_import_specifier_quoted() {
        assert_eq!(
            import_specifier("\"./a.css\""),
            Some("./a.css".to_string())
        );
        assert_eq!(import_specifier("'./b.css'"), Some("./b.css".to_string()));
    }

    #[test]
    fn test_import_specifier_url() {
        assert_eq!(
            import_specifier("url(./plain.css)"),
            Some("./plain.css".to_string())
        );
        assert_eq!(
            import_specifier("url(\"./quoted.css\") screen"),
            Some("./quoted.css".to_string())
        );
    }

    #[test]
    fn test_import_specifier_with_media_query() {
        assert_eq!(
            import_specifier("\"./print.css\" print and (min-width: 25cm)"),
            Some("./print.css".to_string())
        );
    }

    #[test]
    fn test_import_specifier_unparseable() {
        assert_eq!(import_specifier("screen"), None);
        assert_eq!(import_specifier(""), None);
    }
}
