//! Error classification for embedding HTTP requests.

use thiserror::Error;

/// Failure of a single embeddings request
///
/// Only the retry loop sees these; callers receive
/// `DomainError::EmbeddingUnavailable`.
#[derive(Error, Debug)]
pub enum EmbeddingRequestError {
    /// 429 from the server
    #[error("Rate limit exceeded (429): {0}")]
    RateLimited(String),

    /// 5xx from the server
    #[error("Server error ({status}): {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Any other non-success status
    #[error("Request rejected ({status}): {body}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Body could not be decoded or does not match the request
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl EmbeddingRequestError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited(body),
            500..=599 => Self::Server { status, body },
            _ => Self::Client { status, body },
        }
    }

    /// Rate limits, server errors and network failures may succeed on retry
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Server { .. } | Self::Network(_)
        )
    }
}

impl From<reqwest::Error> for EmbeddingRequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
