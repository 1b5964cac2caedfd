//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Auth error: {0}")]
    Auth(#[from] ltp_auth::AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] ltp_catalog::CatalogError),

    #[error("Feed error: {0}")]
    Feed(#[from] ltp_feed::FeedError),

    #[error("Notify error: {0}")]
    Notify(#[from] ltp_notify::NotifyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] ltp_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
