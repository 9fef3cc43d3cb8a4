//! CSS Modules token locator for typed-css-rs.
//!
//! Given the path of a stylesheet, the [`Locator`] resolves and reads the
//! file, applies an optional preprocessor transform, extracts every token the
//! sheet exports (class names and `@value` bindings), follows `@import`,
//! `@value … from`, and `composes … from` references transitively, and
//! returns a [`LoadResult`] listing the tokens with their original source
//! locations plus the set of files the sheet depends on.
//!
//! Results are memoised per file under an mtime-based invalidation policy:
//! a repeated [`Locator::load`] re-reads only when the file or one of its
//! dependencies changed on disk.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use css_locator::Locator;
//!
//! # async fn demo() -> Result<(), css_locator::LoadError> {
//! let locator = Locator::new();
//! let result = locator.load(Utf8Path::new("/project/src/button.css")).await?;
//! for token in &result.tokens {
//!     println!("{} defined at {}", token.name, token.original_location);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod collect;
mod error;
mod locals;
mod locator;
mod position;
mod resolve;
mod specifier;
mod token;
mod transform;

pub use error::LoadError;
pub use locator::{Locator, LocatorOptions};
pub use resolve::{FsResolver, Resolver};
pub use specifier::is_ignored;
pub use token::{LoadResult, Location, Token};
pub use transform::{
    ExtensionTransformer, TransformContext, TransformDep, TransformError, TransformOutcome,
    Transformed, Transformer,
};
