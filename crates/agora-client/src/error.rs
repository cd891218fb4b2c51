//! Error taxonomy of the client core.
//!
//! Transport and storage errors are translated here and never leave the
//! core in their raw form.

use agora_net::NetError;
use agora_shared::constants::{GENERIC_NETWORK_MESSAGE, GENERIC_SERVER_MESSAGE};
use agora_shared::{StorageError, TransportError};
use agora_store::StoreError;
use thiserror::Error;

/// The session store could not be read or written.
///
/// Callers treat this as "not authenticated" and surface it separately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Session storage failed: {0}")]
pub struct StorageFailure(#[from] pub StorageError);

/// Fetching the feed failed. Carries the transport's cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to fetch feed: {cause}")]
pub struct FetchFailure {
    #[source]
    pub cause: TransportError,
}

impl FetchFailure {
    pub fn user_message(&self) -> &str {
        if self.cause.is_no_response() {
            GENERIC_NETWORK_MESSAGE
        } else {
            GENERIC_SERVER_MESSAGE
        }
    }
}

impl From<TransportError> for FetchFailure {
    fn from(cause: TransportError) -> Self {
        Self { cause }
    }
}

/// Why a question or reply was not posted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Input was blank after trimming. Nothing was sent.
    #[error("The {field} must not be empty")]
    Validation { field: &'static str },

    /// No authenticated session. Nothing was sent.
    #[error("You need to be signed in to do that")]
    AuthRequired,

    /// The request reached the server and was refused.
    #[error("Server rejected the request: {}", .message.as_deref().unwrap_or(GENERIC_SERVER_MESSAGE))]
    Server { message: Option<String> },

    /// The request never got a response.
    #[error("Network failure: {0}")]
    Network(String),

    /// The session could not be read, so nothing was sent.
    #[error(transparent)]
    Storage(#[from] StorageFailure),
}

impl SubmissionError {
    /// Text suitable for an inline error next to the input.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message } => message
                .clone()
                .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
            Self::Network(_) => GENERIC_NETWORK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TransportError> for SubmissionError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Unreachable(detail) => Self::Network(detail),
            TransportError::Status { message, .. } => Self::Server { message },
            TransportError::Malformed(_) => Self::Server { message: None },
        }
    }
}

/// Why signing in failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email and password are required")]
    Validation,

    #[error("Incorrect email or password")]
    InvalidCredentials { message: Option<String> },

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Unexpected login response: {0}")]
    Server(String),

    #[error(transparent)]
    Storage(#[from] StorageFailure),
}

impl From<TransportError> for AuthError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Unreachable(detail) => Self::Network(detail),
            other => Self::Server(other.to_string()),
        }
    }
}

/// Failures while wiring the client from configuration.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Transport error: {0}")]
    Net(#[from] NetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
