//! Failure of a single exchange with the friends store

use thiserror::Error;

/// Any failed exchange with the backend. Callers treat every variant the
/// same way; the variants only shape the reason shown to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            StoreError::Status { status: status.as_u16() }
        } else if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Other(e.to_string())
        }
    }
}
