//! Token name conversion.

/// How token names are adjusted before they appear in the declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CamelCaseMode {
    /// Keep names exactly as written in the stylesheet.
    #[default]
    Preserve,
    /// Convert to camelCase: `foo-bar_baz` becomes `fooBarBaz`.
    Camel,
    /// Convert only dashes: `foo-bar_baz` becomes `fooBar_baz`.
    Dashes,
}

impl CamelCaseMode {
    /// Applies the conversion to one token name.
    pub fn convert(self, name: &str) -> String {
        match self {
            CamelCaseMode::Preserve => name.to_string(),
            CamelCaseMode::Camel => camel_case(name),
            CamelCaseMode::Dashes => dashes_case(name),
        }
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if out.is_empty() {
                out.push(c.to_ascii_lowercase());
            } else if upper_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}

fn dashes_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            match chars.peek() {
                Some(next) if next.is_ascii_alphanumeric() => {
                    if let Some(next) = chars.next() {
                        out.push(next.to_ascii_uppercase());
                    }
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns true when `name` can be emitted as a named export.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserve() {
        assert_eq!(CamelCaseMode::Preserve.convert("foo-bar_baz"), "foo-bar_baz");
    }

    #[test]
    fn test_camel() {
        assert_eq!(CamelCaseMode::Camel.convert("foo-bar_baz"), "fooBarBaz");
        assert_eq!(CamelCaseMode::Camel.convert("alreadyCamel"), "alreadyCamel");
        assert_eq!(CamelCaseMode::Camel.convert("PascalCase"), "pascalCase");
    }

    #[test]
    fn test_dashes() {
        assert_eq!(CamelCaseMode::Dashes.convert("foo-bar_baz"), "fooBar_baz");
        assert_eq!(CamelCaseMode::Dashes.convert("trailing-"), "trailing-");
    }

    #[test]
    fn test_identifier_validity() {
        assert!(is_valid_identifier("fooBar"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("$dollar"));
        assert!(!is_valid_identifier("foo-bar"));
        assert!(!is_valid_identifier("1leading"));
        assert!(!is_valid_identifier(""));
    }
}
