//! Typed declaration formatting for typed-css-rs.
//!
//! Turns the tokens a [`css_locator::Locator`] reports into the text of a
//! `.d.ts` file. Two output shapes are supported: the default `export =`
//! object with one readonly key per token, and named `export const`
//! declarations for consumers that prefer tree-shakeable imports.

mod content;
mod names;

pub use content::{output_path, DtsContent, DtsOptions};
pub use names::CamelCaseMode;
