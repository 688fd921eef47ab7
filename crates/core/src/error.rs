//! Error taxonomy for the synchronization core.
//!
//! Three kinds of failure reach the user:
//! - [`TransportError`]: the request did not complete, or the backend answered with a
//!   non-success status and no structured message.
//! - [`ValidationError`]: the backend answered with a non-success status and a message meant
//!   for the user.
//! - [`PreconditionError`]: a required field was missing before any request was issued.

/// A request that could not complete or returned an unstructured failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.describe())]
pub struct TransportError {
    /// HTTP status, or `None` when no response was received.
    pub status: Option<u16>,
    /// Reason phrase or a description of the connection failure.
    pub status_text: String,
}

impl TransportError {
    /// A non-success HTTP response.
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            status_text: status_text.into(),
        }
    }

    /// A request that never produced a response (connection refused, DNS, decode failure).
    pub fn connection(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            status_text: reason.into(),
        }
    }

    fn describe(&self) -> String {
        match self.status {
            Some(status) => format!("request failed with status {status} {}", self.status_text),
            None => format!("request failed: {}", self.status_text),
        }
    }
}

/// A structured rejection from the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub status: u16,
    /// Server-supplied message, shown verbatim.
    pub message: String,
}

/// A required field was missing; no request was issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PreconditionError(pub String);

impl PreconditionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures of the persisted credential slot.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read credential file: {0}")]
    Read(std::io::Error),
    #[error("failed to write credential file: {0}")]
    Write(std::io::Error),
    #[error("failed to remove credential file: {0}")]
    Remove(std::io::Error),
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("not logged in")]
    NotLoggedIn,
}

/// Failure of an address lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    /// The geocoding service answered but could not resolve the address.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure to decode a payload into a typed record.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode {resource} payload: {source}")]
pub struct DecodeError {
    pub resource: String,
    #[source]
    pub source: serde_json::Error,
}

impl From<DecodeError> for TransportError {
    fn from(err: DecodeError) -> Self {
        TransportError::connection(err.to_string())
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
