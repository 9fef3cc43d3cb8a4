//! Source maps from preprocessor output back to the original stylesheet.
//!
//! A preprocessor backend that rewrites its input builds a [`SourceMap`]
//! alongside the emitted CSS. The locator then asks the map where a position
//! in the emitted CSS came from, so token locations always point at the file
//! the author wrote.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// A single mapping from an emitted span to the original span it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The span in the emitted CSS.
    pub generated: Span,
    /// The span in the original source.
    pub original: Span,
}

/// Translates positions in emitted CSS back to the original source.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    /// Mappings sorted by emitted position.
    mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Creates an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if the map has no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Finds the original position for a position in the emitted CSS.
    ///
    /// Returns `None` when no mapping covers the position, e.g. for text the
    /// preprocessor synthesised.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.start.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let mapping = self.mappings.get(idx).filter(|m| m.generated.contains(generated))?;
        let offset_in_span = u32::from(generated) - u32::from(mapping.generated.start);
        Some(mapping.original.start + TextSize::from(offset_in_span))
    }
}

/// Builds a [`SourceMap`] while a preprocessor emits its output.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    /// Current position in the emitted output.
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    /// Creates a new builder positioned at the start of the output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current emitted offset.
    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Records text copied verbatim from the original source.
    pub fn add_source(&mut self, original_start: ByteOffset, text: &str) {
        let len = text.len() as u32;
        let original = Span::new(original_start, original_start + TextSize::from(len));
        self.add_transformed(original, text);
    }

    /// Records emitted text that replaces the given original span.
    ///
    /// Lengths may differ; positions inside the emitted span map linearly
    /// from its start.
    pub fn add_transformed(&mut self, original: Span, generated_text: &str) {
        let gen_len = generated_text.len() as u32;
        self.mappings.push(Mapping {
            generated: Span::new(
                self.generated_offset,
                self.generated_offset + TextSize::from(gen_len),
            ),
            original,
        });
        self.generated_offset += TextSize::from(gen_len);
    }

    /// Records synthetic emitted text with no original counterpart.
    pub fn add_generated(&mut self, text: &str) {
        self.generated_offset += TextSize::from(text.len() as u32);
    }

    /// Builds the final source map.
    pub fn build(mut self) -> SourceMap {
        self.mappings.sort_by_key(|m| m.generated.start);
        SourceMap {
            mappings: self.mappings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_resolves_nothing() {
        let map = SourceMap::new();
        assert!(map.is_empty());
        assert_eq!(map.original_position(TextSize::from(0)), None);
    }

    #[test]
    fn test_verbatim_copy() {
        let mut builder = SourceMapBuilder::new();
        builder.add_source(TextSize::from(10), ".base");
        let map = builder.build();

        assert_eq!(
            map.original_position(TextSize::from(0)),
            Some(TextSize::from(10))
        );
        assert_eq!(
            map.original_position(TextSize::from(4)),
            Some(TextSize::from(14))
        );
        assert_eq!(map.original_position(TextSize::from(5)), None);
    }

    #[test]
    fn test_synthetic_text_has_no_origin() {
        let mut builder = SourceMapBuilder::new();
        builder.add_source(TextSize::from(0), ".a");
        builder.add_generated(" { color: red }");
        builder.add_source(TextSize::from(20), ".b");
        let map = builder.build();

        // Synthetic block does not resolve.
        assert_eq!(map.original_position(TextSize::from(6)), None);
        // The second copied span resolves past it.
        assert_eq!(
            map.original_position(TextSize::from(17)),
            Some(TextSize::from(20))
        );
    }

    #[test]
    fn test_transformed_span_maps_linearly() {
        let mut builder = SourceMapBuilder::new();
        // "$color" (6 bytes at offset 4) expanded to "red" (3 bytes).
        builder.add_transformed(Span::new(4u32, 10u32), "red");
        let map = builder.build();

        assert_eq!(
            map.original_position(TextSize::from(0)),
            Some(TextSize::from(4))
        );
        assert_eq!(
            map.original_position(TextSize::from(2)),
            Some(TextSize::from(6))
        );
        assert_eq!(map.original_position(TextSize::from(3)), None);
    }
}
