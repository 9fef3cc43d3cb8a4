//! Preprocessor transformer contract and gateway.

use crate::error::LoadError;
use crate::resolve::Resolver;
use crate::specifier::is_ignored;
use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashMap;
use source_map::SourceMap;
use thiserror::Error;

/// What a transformer sees alongside the source text.
pub struct TransformContext<'a> {
    /// The file being transformed.
    pub from: &'a Utf8Path,
    /// The locator's resolver, for backends that resolve their own imports.
    pub resolver: &'a dyn Resolver,
}

/// A dependency reported by a transformer.
///
/// Backends either report plain paths or structured references carrying a
/// protocol; only `file:` survives normalisation.
#[derive(Debug, Clone)]
pub enum TransformDep {
    /// A plain filesystem path (or a remote URL, which is filtered out).
    Path(Utf8PathBuf),
    /// A protocol-qualified reference.
    Structured {
        /// The protocol without the trailing colon, e.g. `file`.
        protocol: String,
        /// The referenced path.
        pathname: Utf8PathBuf,
    },
}

/// The output of a transformer that handled its input.
#[derive(Debug, Default)]
pub struct Transformed {
    /// The emitted plain CSS.
    pub css: String,
    /// A map from the emitted CSS back to the original source, when the
    /// backend rewrote it.
    pub map: Option<SourceMap>,
    /// Files the backend read while transforming (partials, mixins, …).
    pub dependencies: Vec<TransformDep>,
}

/// The outcome of asking a transformer about a file.
#[derive(Debug)]
pub enum TransformOutcome {
    /// The transformer does not handle this file; the source is used as-is.
    NotHandled,
    /// The transformer produced CSS.
    Handled(Transformed),
}

/// A preprocessor failure, surfaced as a syntax error of the source file.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransformError {
    /// The backend's message.
    pub message: String,
    /// 1-based line in the source file, when the backend reports one.
    pub line: Option<u32>,
    /// 0-based column, when the backend reports one.
    pub column: Option<u32>,
}

/// An optional preprocessor stage run before parsing.
pub trait Transformer {
    /// Transforms `source` into plain CSS, or declines.
    fn transform(
        &self,
        source: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<TransformOutcome, TransformError>;
}

/// The normalised output the load engine consumes.
#[derive(Debug)]
pub(crate) struct TransformOutput {
    pub css: String,
    pub map: Option<SourceMap>,
    pub dependencies: Vec<Utf8PathBuf>,
}

/// Applies the configured transformer to raw source.
///
/// A missing transformer and a `NotHandled` outcome are equivalent: the
/// source passes through untouched. Handled output has its dependency list
/// normalised: structured references must be `file:`, and remote specifiers
/// are dropped.
pub(crate) fn apply(
    transformer: Option<&dyn Transformer>,
    source: &str,
    from: &Utf8Path,
    resolver: &dyn Resolver,
) -> Result<TransformOutput, LoadError> {
    let outcome = match transformer {
        Some(transformer) => {
            let ctx = TransformContext { from, resolver };
            transformer
                .transform(source, &ctx)
                .map_err(|e| LoadError::Syntax {
                    path: from.to_owned(),
                    line: e.line.unwrap_or(1),
                    column: e.column.unwrap_or(0),
                    message: e.message,
                })?
        }
        None => TransformOutcome::NotHandled,
    };

    match outcome {
        TransformOutcome::NotHandled => Ok(TransformOutput {
            css: source.to_string(),
            map: None,
            dependencies: Vec::new(),
        }),
        TransformOutcome::Handled(transformed) => {
            let mut dependencies = Vec::new();
            for dep in transformed.dependencies {
                let path = match dep {
                    TransformDep::Path(path) => path,
                    TransformDep::Structured { protocol, pathname } => {
                        if protocol != "file" {
                            return Err(LoadError::UnsupportedProtocol {
                                protocol,
                                from: from.to_owned(),
                            });
                        }
                        pathname
                    }
                };
                if is_ignored(path.as_str()) {
                    continue;
                }
                dependencies.push(path);
            }
            Ok(TransformOutput {
                css: transformed.css,
                map: transformed.map,
                dependencies,
            })
        }
    }
}

/// The default transformer: dispatches to a registered backend by file
/// extension and declines everything else.
///
/// Ships with an empty registry; preprocessor backends are registered by the
/// embedding tool.
#[derive(Default)]
pub struct ExtensionTransformer {
    backends: FxHashMap<String, Box<dyn Transformer>>,
}

impl ExtensionTransformer {
    /// Creates a dispatcher with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend for an extension (without the dot, e.g. `scss`).
    pub fn register(&mut self, extension: impl Into<String>, backend: Box<dyn Transformer>) {
        self.backends.insert(extension.into(), backend);
    }
}

impl Transformer for ExtensionTransformer {
    fn transform(
        &self,
        source: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<TransformOutcome, TransformError> {
        let backend = ctx
            .from
            .extension()
            .and_then(|ext| self.backends.get(ext));
        match backend {
            Some(backend) => backend.transform(source, ctx),
            None => Ok(TransformOutcome::NotHandled),
        }
    }
}
