//! Catalog error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog fetch failed: {0}")]
    Fetch(String),

    #[error("Catalog parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
