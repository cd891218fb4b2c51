use thiserror::Error;

/// Failures reported by a [`crate::ports::Transport`] implementation.
///
/// A request that reached the server and was refused is *not* an error at
/// this level; mutations report that through
/// [`crate::protocol::MutationOutcome::Rejected`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never got a response (connection refused, DNS, timeout).
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// The server answered a read with a non-success status.
    #[error("Server returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The server answered but the payload could not be decoded.
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Whether the request never reached the server.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

/// Failures reported by a [`crate::ports::SessionStore`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt session data: {0}")]
    Corrupt(String),
}
