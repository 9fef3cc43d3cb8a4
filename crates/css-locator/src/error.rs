//! Load error taxonomy.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error surfaced by [`Locator::load`](crate::Locator::load).
///
/// Nothing is recovered inside the locator: the first error aborts the whole
/// load and no partial result is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The stylesheet (or its preprocessor source) failed to parse.
    #[error("{path}:{line}:{column}: {message}")]
    Syntax {
        /// The file the error refers to.
        path: Utf8PathBuf,
        /// 1-based line.
        line: u32,
        /// 0-based column.
        column: u32,
        /// The parser's message.
        message: String,
    },

    /// The resolver reported the specifier as not found.
    #[error("cannot resolve \"{specifier}\" imported from {request}")]
    Resolution {
        /// The specifier that failed to resolve.
        specifier: String,
        /// The file the specifier appeared in.
        request: Utf8PathBuf,
    },

    /// A transformer reported a dependency with a non-`file:` protocol.
    #[error("unsupported protocol \"{protocol}:\" in dependency reported for {from}")]
    UnsupportedProtocol {
        /// The offending protocol, without the trailing colon.
        protocol: String,
        /// The file whose transform reported the dependency.
        from: Utf8PathBuf,
    },

    /// A second top-level load was issued while one was in flight.
    #[error("a load is already in flight on this locator")]
    ConcurrentLoad,

    /// A filesystem stat or read failed.
    #[error("failed to read {path}")]
    Io {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
