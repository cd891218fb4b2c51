use thiserror::Error;

/// Errors raised while building the HTTP transport.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
