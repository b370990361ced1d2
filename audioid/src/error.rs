//! Error types for the matching engine
//!
//! Nothing here is fatal to the host process. Parse and transport errors are
//! recovered inside a lookup cycle (logged, the source contributes zero
//! candidates); only [`LookupError`] ever reaches the caller.

use thiserror::Error;

/// Malformed top-level document
#[derive(Debug, Error)]
pub enum ParseError {
    /// Payload is not valid UTF-8
    #[error("Payload is not UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// XML could not be parsed
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// JSON could not be parsed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a lookup collaborator
#[derive(Debug, Error)]
pub enum TransportError {
    /// Service unreachable, rate limited or answered with an error status
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-visible lookup error
#[derive(Debug, Error)]
pub enum LookupError {
    /// A new song was submitted before the previous cycle finished
    #[error("Lookup cycle already in progress")]
    CycleInProgress,
}

/// Result type for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;
