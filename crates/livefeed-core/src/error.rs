//! Unified error types for LiveFeed.
//!
//! All crates map their internal errors into [`SyncError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The operation was attempted without a usable scope descriptor.
    /// This is a caller-side bug; no network call is made.
    MissingScope,
    /// The network transport failed (connect error, timeout, broken pipe).
    Transport,
    /// The server answered with a non-2xx status.
    Server,
    /// A mutation referenced an item not present in the snapshot.
    NotFound,
    /// The response body did not match the expected schema.
    /// May indicate an API contract change; logged distinctly.
    MalformedResponse,
    /// The persisted snapshot cache could not be read or written.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// The operation was attempted after the synchronizer was torn down.
    Closed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScope => write!(f, "MISSING_SCOPE"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Server => write!(f, "SERVER"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// The unified error used throughout LiveFeed.
///
/// All crate-specific errors are mapped into `SyncError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire library boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct SyncError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SyncError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a missing-scope error.
    pub fn missing_scope(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingScope, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a malformed-response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a closed error.
    pub fn closed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Closed, message)
    }

    /// Whether this error is soft-swallowed at the refresh boundary
    /// (recorded in `last_error`, last-known-good snapshot preserved)
    /// rather than bubbled to the caller's render path.
    pub fn is_soft(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport | ErrorKind::Server | ErrorKind::MalformedResponse
        )
    }
}

impl Clone for SyncError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::MalformedResponse,
            format!("JSON decode error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Cache, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
