//! HTTP client for downloading the instrument catalog.

use crate::error::{CatalogError, CatalogResult};
use crate::index::CatalogIndex;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// Well-known scrip-master location.
pub const DEFAULT_CATALOG_URL: &str = "https://images.dhan.co/api-data/api-scrip-master.csv";

/// The catalog download is large; allow a generous timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of the instrument catalog.
///
/// Seam for the resolver: production uses [`CatalogClient`], tests
/// substitute in-memory sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> CatalogResult<CatalogIndex>;
}

/// Downloads the scrip-master CSV from its hosted location.
pub struct CatalogClient {
    client: Client,
    url: String,
}

impl CatalogClient {
    pub fn new(url: impl Into<String>) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Fetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch(&self) -> CatalogResult<CatalogIndex> {
        info!(url = %self.url, "Downloading instrument catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Fetch(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Fetch(format!("failed to read body: {e}")))?;

        let index = CatalogIndex::parse(body.as_ref())?;
        info!(instruments = index.len(), "Instrument catalog indexed");

        Ok(index)
    }
}
