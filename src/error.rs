//! Muninn error types

/// Muninn error types
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    /// An argument has no deterministic canonical representation, so no
    /// stable cache key can be derived from it.
    ///
    /// Only the external-cache path derives keys; local-table memos key on
    /// structural equality and never produce this error.
    #[error("argument has no deterministic canonical form: {0}")]
    DigestNonDeterministic(String),

    /// The external cache backend is unreachable or misconfigured.
    ///
    /// Propagated to the caller as-is. The keyed memo never falls back to
    /// uncached computation when the adapter fails — callers opted into the
    /// external-cache path explicitly and get to see it break.
    #[error("cache adapter unavailable: {0}")]
    AdapterUnavailable(String),

    /// The wrapped computation itself failed.
    ///
    /// Nothing is cached for the failing argument tuple; the next call with
    /// the same arguments retries the computation.
    #[error("computation failed: {0}")]
    Computation(String),

    /// A cached value could not cross the adapter boundary.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MuninnError {
    /// Wrap an arbitrary failure from a memoized computation.
    pub fn computation(err: impl std::fmt::Display) -> Self {
        MuninnError::Computation(err.to_string())
    }

    /// Wrap an arbitrary backend failure.
    pub fn adapter(err: impl std::fmt::Display) -> Self {
        MuninnError::AdapterUnavailable(err.to_string())
    }
}

/// Result type alias for muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
