//! Error types shared across the crate.
//!
//! Two concerns, two enums: [`DocumentError`] is the memoized failure outcome
//! handed to every accessor waiter, so it must be `Clone`; [`PluginError`] is
//! what a middleware hook returns to the pipeline when it cannot process a
//! result at all.

use thiserror::Error;

/// Failure while reading a response body stream.
#[derive(Debug, Clone, Error)]
pub enum BodyError {
    /// The underlying transport failed before the stream ended.
    #[error("body stream failed: {0}")]
    Transport(String),
}

/// Failure outcome of the lazy document accessor.
///
/// Cloned into every pending and future waiter once memoized, which is why
/// the payloads are owned strings rather than source error types.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// The body stream errored before signalling end-of-stream.
    #[error("body stream failed before completion: {0}")]
    Stream(#[from] BodyError),
    /// The buffered body was not valid UTF-8 text.
    #[error("body is not valid utf-8: {0}")]
    Decode(String),
    /// A query used a selector the document library rejected.
    #[error("invalid selector `{0}`")]
    Selector(String),
    /// The buffering task vanished before resolving. Waiters receive this
    /// instead of hanging forever.
    #[error("document buffering task dropped before resolving")]
    Aborted,
}

/// Error raised by a plugin's middleware hook.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin failed while processing a crawl result.
    #[error("plugin `{plugin}` failed: {message}")]
    Middleware {
        /// Name of the failing plugin.
        plugin: String,
        /// Human-readable failure description.
        message: String,
    },
}
