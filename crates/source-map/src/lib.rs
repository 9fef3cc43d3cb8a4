//! Source position tracking for typed-css-rs.
//!
//! This crate provides the position plumbing shared by the CSS parser and the
//! token locator: byte spans over stylesheet text, a line index for
//! offset ↔ line/column conversion, and a source map that translates
//! positions in preprocessor output (SCSS, Less, …) back to the original
//! stylesheet.

mod line_index;
mod map;
mod span;

pub use line_index::{LineCol, LineIndex};
pub use map::{Mapping, SourceMap, SourceMapBuilder};
pub use span::{ByteOffset, Span};
