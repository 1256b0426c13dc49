//! Error types shared by the listener, connection and file resolver.

use std::io;
use thiserror::Error;

use crate::http::parser::ParseError;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Failures a connection or the listener can run into.
///
/// Everything except [`ServerError::Bind`] is contained within a single
/// connection: the accept loop logs it and keeps going.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound (port in use, no privilege)
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The request could not be parsed; the connection is dropped unanswered
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    /// No route and no static file
    #[error("not found")]
    NotFound,

    /// Socket or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read or write deadline elapsed
    #[error("{0} timed out")]
    Timeout(&'static str),
}

impl ServerError {
    /// Whether the failure was the client's fault rather than ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::MalformedRequest(_) | ServerError::Timeout(_) | ServerError::NotFound
        )
    }
}
