//! The token data model the locator reports.

use camino::Utf8PathBuf;
use smol_str::SmolStr;
use std::fmt;

/// A point in an original (pre-transform) source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// The file the position refers to.
    pub file_path: Utf8PathBuf,
    /// 1-based line number.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.column)
    }
}

/// An exported identifier of a stylesheet: a local class name or an `@value`
/// binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The name the consumer sees.
    pub name: SmolStr,
    /// The source-sheet name when this token was re-exported under an alias
    /// (`@value alias from "…"` with differing names); `None` otherwise.
    pub imported_name: Option<SmolStr>,
    /// The definition site in the defining sheet, not the importing sheet.
    pub original_location: Location,
}

/// The outcome of loading a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadResult {
    /// The de-duplicated set of absolute paths this sheet transitively
    /// depends on, in first-seen order, excluding the sheet itself.
    pub dependencies: Vec<Utf8PathBuf>,
    /// The exported tokens, de-duplicated by structural equality, in
    /// first-seen order.
    pub tokens: Vec<Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let location = Location {
            file_path: Utf8PathBuf::from("/project/a.css"),
            line: 3,
            column: 0,
        };
        assert_eq!(location.to_string(), "/project/a.css:3:0");
    }
}
