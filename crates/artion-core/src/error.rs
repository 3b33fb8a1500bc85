//! Error types for artion.
//!
//! A single error type with explicit variants for transport, backend,
//! input validation and wire-format failures. Shape mismatches between a
//! document and a domain record are not errors; see [`crate::codec`].

use std::fmt;
use thiserror::Error;

/// The unified error type for artion operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout, IO).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The backend rejected the request (permission, quota, malformed query, not found on update).
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Input validation errors (collection names, ids, URLs, cursors).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The backend answered with a payload that could not be understood.
    #[error("unexpected response: {message}")]
    Wire { message: String },
}

impl Error {
    /// Build a [`Error::Wire`] from anything displayable.
    pub fn wire(message: impl fmt::Display) -> Self {
        Error::Wire {
            message: message.to_string(),
        }
    }

    /// Returns true if the backend reported that the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Backend(e) if e.is_not_found())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local storage IO error.
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// An error reported by the backend.
#[derive(Debug)]
pub struct BackendError {
    /// HTTP status code.
    pub status: u16,
    /// Backend status code such as `NOT_FOUND` (if present).
    pub code: Option<String>,
    /// Error message from the backend.
    pub message: Option<String>,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {}

impl BackendError {
    /// Create a new backend error.
    pub fn new(status: u16, code: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// A not-found error in the shape the remote backend uses.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, Some("NOT_FOUND".to_string()), Some(message.into()))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.code.as_deref() == Some("NOT_FOUND")
    }

    /// Check if the backend refused the caller's credentials.
    pub fn is_permission_denied(&self) -> bool {
        self.status == 401
            || self.status == 403
            || self.code.as_deref() == Some("PERMISSION_DENIED")
            || self.code.as_deref() == Some("UNAUTHENTICATED")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid collection name.
    #[error("invalid collection name '{value}': {reason}")]
    CollectionName { value: String, reason: String },

    /// Invalid document id.
    #[error("invalid document id '{value}': {reason}")]
    DocumentId { value: String, reason: String },

    /// Invalid store URL.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// A cursor token that could not be decoded.
    #[error("invalid cursor: {reason}")]
    Cursor { reason: String },

    /// A cursor replayed against a query of a different shape.
    #[error("cursor was produced by a different query shape")]
    CursorMismatch,

    /// A query executed through a collection it does not target.
    #[error("query targets collection '{query}', not '{collection}'")]
    CollectionMismatch { query: String, collection: String },

    /// Page size must be at least one.
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        let err = BackendError::new(
            400,
            Some("INVALID_ARGUMENT".to_string()),
            Some("order by clause cannot contain a field with an equality filter".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "HTTP 400 [INVALID_ARGUMENT]: order by clause cannot contain a field with an equality filter"
        );
    }

    #[test]
    fn not_found_classification() {
        let err: Error = BackendError::not_found("no entity to update").into();
        assert!(err.is_not_found());

        let err: Error = BackendError::new(403, Some("PERMISSION_DENIED".into()), None).into();
        assert!(!err.is_not_found());
        assert!(matches!(err, Error::Backend(ref e) if e.is_permission_denied()));
    }
}
