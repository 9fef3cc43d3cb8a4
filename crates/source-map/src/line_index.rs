//! Line index for offset ↔ line/column conversion.

use crate::ByteOffset;
use text_size::TextSize;

/// A zero-based line and column position.
///
/// Consumers that report one-based lines (stylesheet locations do) convert at
/// the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within the line).
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Maps byte offsets to line/column positions in O(log n).
///
/// Built once per stylesheet; the index records where each line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<ByteOffset>,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }
        Self { line_starts }
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Offsets past the last line start clamp to the final line.
    pub fn line_col(&self, offset: ByteOffset) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(offset) - u32::from(line_start),
        }
    }

    /// Converts a line/column position back to a byte offset.
    ///
    /// Returns `None` if the line is out of bounds.
    pub fn offset(&self, pos: LineCol) -> Option<ByteOffset> {
        let line_start = *self.line_starts.get(pos.line as usize)?;
        Some(line_start + TextSize::from(pos.col))
    }
}
