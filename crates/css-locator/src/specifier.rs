//! Specifier classification.

/// Returns true for specifiers the locator never attempts to resolve.
///
/// Remote stylesheets cannot contribute tokens or dependencies, so `@import`
/// and `@value … from` references to them are skipped before resolution.
pub fn is_ignored(specifier: &str) -> bool {
    specifier.starts_with("http://") || specifier.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_specifiers_are_ignored() {
        assert!(is_ignored("http://example.com/a.css"));
        assert!(is_ignored("https://example.com/a.css"));
    }

    #[test]
    fn test_local_specifiers_are_not_ignored() {
        assert!(!is_ignored("./a.css"));
        assert!(!is_ignored("../theme/b.css"));
        assert!(!is_ignored("some-package/c.css"));
        assert!(!is_ignored("/abs/d.css"));
        // Only the two URL schemes are remote; a file named oddly is not.
        assert!(!is_ignored("httpx/e.css"));
    }
}
