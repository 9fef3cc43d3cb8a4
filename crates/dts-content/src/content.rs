//! Declaration file assembly.

use crate::names::{is_valid_identifier, CamelCaseMode};
use camino::{Utf8Path, Utf8PathBuf};
use css_locator::Token;

/// Options controlling the emitted declaration text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DtsOptions {
    /// Token name conversion.
    pub camel_case: CamelCaseMode,
    /// Emit `export const name: string;` per token instead of the
    /// `export =` object.
    pub named_exports: bool,
    /// Replace the stylesheet extension instead of appending to it when
    /// deriving the output path.
    pub drop_extension: bool,
}

/// The declaration content for one stylesheet.
#[derive(Debug)]
pub struct DtsContent {
    names: Vec<String>,
    warnings: Vec<String>,
    named_exports: bool,
}

impl DtsContent {
    /// Builds declaration content from located tokens.
    ///
    /// Names are converted per the options, then de-duplicated preserving
    /// first-seen order. In named-exports mode, names that are not valid JS
    /// identifiers are skipped and reported as warnings.
    pub fn new(tokens: &[Token], options: &DtsOptions) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(tokens.len());
        let mut warnings = Vec::new();

        for token in tokens {
            let name = options.camel_case.convert(&token.name);
            if names.contains(&name) {
                continue;
            }
            if options.named_exports && !is_valid_identifier(&name) {
                warnings.push(format!(
                    "skipping \"{}\": not a valid name for a named export (consider --camel-case)",
                    name
                ));
                continue;
            }
            names.push(name);
        }

        Self {
            names,
            warnings,
            named_exports: options.named_exports,
        }
    }

    /// The emitted token names, post conversion, in declaration order.
    pub fn token_names(&self) -> &[String] {
        &self.names
    }

    /// Warnings produced while assembling the content.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Returns true when the declaration exports nothing.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The full text of the `.d.ts` file.
    pub fn formatted(&self) -> String {
        if self.named_exports {
            let mut out = String::from("export const __esModule: true;\n");
            for name in &self.names {
                out.push_str(&format!("export const {name}: string;\n"));
            }
            out
        } else {
            let mut out = String::from("declare const styles: {\n");
            for name in &self.names {
                out.push_str(&format!("  readonly \"{name}\": string;\n"));
            }
            out.push_str("};\nexport = styles;\n");
            out
        }
    }
}

/// Derives the declaration file path for a stylesheet.
pub fn output_path(input: &Utf8Path, options: &DtsOptions) -> Utf8PathBuf {
    if options.drop_extension {
        input.with_extension("d.ts")
    } else {
        Utf8PathBuf::from(format!("{input}.d.ts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_locator::Location;

    fn token(name: &str) -> Token {
        Token {
            name: name.into(),
            imported_name: None,
            original_location: Location {
                file_path: Utf8PathBuf::from("/p/a.css"),
                line: 1,
                column: 0,
            },
        }
    }

    #[test]
    fn test_default_format() {
        let content = DtsContent::new(&[token("primary"), token("accent")], &DtsOptions::default());
        assert_eq!(
            content.formatted(),
            "declare const styles: {\n  readonly \"primary\": string;\n  readonly \"accent\": string;\n};\nexport = styles;\n"
        );
    }

    #[test]
    fn test_empty_default_format() {
        let content = DtsContent::new(&[], &DtsOptions::default());
        assert!(content.is_empty());
        assert_eq!(
            content.formatted(),
            "declare const styles: {\n};\nexport = styles;\n"
        );
    }

    #[test]
    fn test_named_exports() {
        let options = DtsOptions {
            named_exports: true,
            ..Default::default()
        };
        let content = DtsContent::new(&[token("primary")], &options);
        assert_eq!(
            content.formatted(),
            "export const __esModule: true;\nexport const primary: string;\n"
        );
    }

    #[test]
    fn test_named_exports_skip_invalid_identifiers() {
        let options = DtsOptions {
            named_exports: true,
            ..Default::default()
        };
        let content = DtsContent::new(&[token("foo-bar"), token("ok")], &options);
        assert_eq!(content.token_names(), ["ok"]);
        assert_eq!(content.warnings().len(), 1);
        assert!(content.warnings()[0].contains("foo-bar"));
    }

    #[test]
    fn test_camel_case_collapse_deduplicates() {
        let options = DtsOptions {
            camel_case: CamelCaseMode::Camel,
            ..Default::default()
        };
        // Both names convert to the same identifier.
        let content = DtsContent::new(&[token("foo-bar"), token("fooBar")], &options);
        assert_eq!(content.token_names(), ["fooBar"]);
    }

    #[test]
    fn test_output_path() {
        let options = DtsOptions::default();
        assert_eq!(
            output_path(Utf8Path::new("/p/button.css"), &options),
            Utf8PathBuf::from("/p/button.css.d.ts")
        );

        let drop = DtsOptions {
            drop_extension: true,
            ..Default::default()
        };
        assert_eq!(
            output_path(Utf8Path::new("/p/button.css"), &drop),
            Utf8PathBuf::from("/p/button.d.ts")
        );
    }
}
