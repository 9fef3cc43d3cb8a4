//! Position lookup from parsed spans back to original-file locations.

use crate::token::Location;
use camino::Utf8Path;
use source_map::{ByteOffset, LineIndex, SourceMap};

/// Built once per load, translates byte offsets in the parsed CSS into
/// [`Location`]s in the file the author wrote.
///
/// With a transform map, offsets are first mapped back to the original
/// source; without one the parsed text *is* the original and positions come
/// straight from it. Offsets the map does not cover (text the preprocessor
/// synthesised) fall back to positions in the transformed text.
pub(crate) struct PositionMapper<'a> {
    file: &'a Utf8Path,
    map: Option<&'a SourceMap>,
    original_index: LineIndex,
    transformed_index: Option<LineIndex>,
}

impl<'a> PositionMapper<'a> {
    pub fn new(
        file: &'a Utf8Path,
        original_source: &str,
        css: &str,
        map: Option<&'a SourceMap>,
    ) -> Self {
        match map {
            Some(_) => Self {
                file,
                map,
                original_index: LineIndex::new(original_source),
                transformed_index: Some(LineIndex::new(css)),
            },
            None => Self {
                file,
                map: None,
                original_index: LineIndex::new(css),
                transformed_index: None,
            },
        }
    }

    /// Returns the location of an offset in the parsed CSS.
    pub fn location(&self, offset: ByteOffset) -> Location {
        let line_col = match self.map.and_then(|m| m.original_position(offset)) {
            Some(original) => self.original_index.line_col(original),
            None => match &self.transformed_index {
                Some(index) => index.line_col(offset),
                None => self.original_index.line_col(offset),
            },
        };
        Location {
            file_path: self.file.to_owned(),
            line: line_col.line + 1,
            column: line_col.col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_map::{SourceMapBuilder, Span};

    #[test]
    fn test_without_map_positions_come_from_parsed_text() {
        let css = ".a {}\n.b {}";
        let mapper = PositionMapper::new(Utf8Path::new("/p/a.css"), css, css, None);
        let location = mapper.location(ByteOffset::from(6));
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 0);
        assert_eq!(location.file_path, "/p/a.css");
    }

    #[test]
    fn test_with_map_positions_come_from_original() {
        // Original has a leading variable block the transform removed.
        let original = "$c: red;\n.a { color: $c }";
        let css = ".a { color: red }";
        let mut builder = SourceMapBuilder::new();
        builder.add_transformed(Span::new(9u32, 26u32), css);
        let map = builder.build();

        let mapper = PositionMapper::new(Utf8Path::new("/p/a.scss"), original, css, Some(&map));
        let location = mapper.location(ByteOffset::from(0));
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 0);
    }

    #[test]
    fn test_unmapped_offset_falls_back_to_transformed() {
        let original = ".a {}";
        let css = "/* injected */ .a {}";
        let mut builder = SourceMapBuilder::new();
        builder.add_generated("/* injected */ ");
        builder.add_source(ByteOffset::from(0), ".a {}");
        let map = builder.build();

        let mapper = PositionMapper::new(Utf8Path::new("/p/a.scss"), original, css, Some(&map));
        // Offset inside the injected comment has no original counterpart.
        let location = mapper.location(ByteOffset::from(3));
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 3);
        // The copied rule maps back to column 0.
        let location = mapper.location(ByteOffset::from(15));
        assert_eq!(location.column, 0);
    }
}
