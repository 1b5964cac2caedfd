//! Authentication error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
