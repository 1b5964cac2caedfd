//! Notification error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid destination: {0}")]
    InvalidDestination(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
