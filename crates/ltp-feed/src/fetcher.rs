//! Batched price fetching with partial-failure accounting.

use crate::error::{FeedError, FeedResult};
use crate::wire::{build_payload, extract_prices};
use ltp_auth::Authenticator;
use ltp_core::{CycleResult, InstrumentOutcome, Price, PriceQuote, ResolvedInstrument};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default provider API base.
pub const DEFAULT_API_BASE: &str = "https://api.dhan.co/v2";

const LTP_PATH: &str = "/marketfeed/ltp";
const OHLC_PATH: &str = "/marketfeed/ohlc";

/// Provider limit on identifiers per request.
const MAX_INSTRUMENTS_PER_REQUEST: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues authenticated LTP queries for a resolved instrument set.
pub struct PriceFetcher {
    client: Client,
    base_url: String,
    authenticator: Arc<Authenticator>,
}

impl PriceFetcher {
    pub fn new(base_url: impl Into<String>, authenticator: Arc<Authenticator>) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FeedError::HttpClient(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authenticator,
        })
    }

    /// Fetch prices for the full instrument set.
    ///
    /// Never fails as a whole: instruments whose query errored are marked
    /// failed in the returned `CycleResult`, and a total transport
    /// failure yields zero quotes with every instrument failed.
    pub async fn fetch(&self, instruments: &[ResolvedInstrument]) -> CycleResult {
        if instruments.is_empty() {
            return CycleResult::new(Vec::new());
        }

        let mut prices: HashMap<(String, String), Price> = HashMap::new();

        // Batched LTP queries
        for chunk in instruments
            .iter()
            .collect::<Vec<_>>()
            .chunks(MAX_INSTRUMENTS_PER_REQUEST)
        {
            match self.post(LTP_PATH, &build_payload(chunk)).await {
                Ok(body) => extract_prices(&body, false, &mut prices),
                Err(e) => error!(error = %e, batch = chunk.len(), "LTP request failed"),
            }
        }

        // OHLC close-price fallback for identifiers the LTP response missed
        let missing: Vec<&ResolvedInstrument> = instruments
            .iter()
            .filter(|inst| !prices.contains_key(&price_key(inst)))
            .collect();

        if !missing.is_empty() {
            debug!(count = missing.len(), "Retrying missing identifiers via OHLC");
            for chunk in missing.chunks(MAX_INSTRUMENTS_PER_REQUEST) {
                match self.post(OHLC_PATH, &build_payload(chunk)).await {
                    Ok(body) => extract_prices(&body, true, &mut prices),
                    Err(e) => warn!(error = %e, "OHLC fallback request failed"),
                }
            }
        }

        let result = assemble(instruments, &prices);
        if result.is_total_failure() {
            warn!(
                instruments = instruments.len(),
                "Price fetch produced no quotes"
            );
        } else if result.failed_count() > 0 {
            warn!(
                priced = result.priced_count(),
                failed = result.failed_count(),
                "Partial price fetch"
            );
        }
        result
    }

    async fn post(&self, path: &str, payload: &Value) -> FeedResult<Value> {
        let headers = self
            .authenticator
            .headers("POST", path)
            .map_err(|e| FeedError::HttpClient(format!("auth header construction failed: {e}")))?;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(|e| FeedError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::HttpClient(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Malformed(format!("failed to parse response: {e}")))
    }
}

fn price_key(inst: &ResolvedInstrument) -> (String, String) {
    (
        inst.segment.as_wire().to_string(),
        inst.trading_identifier.clone(),
    )
}

/// Assemble the cycle result in input (configured) order.
fn assemble(
    instruments: &[ResolvedInstrument],
    prices: &HashMap<(String, String), Price>,
) -> CycleResult {
    let outcomes = instruments
        .iter()
        .map(|inst| match prices.get(&price_key(inst)) {
            Some(price) => {
                InstrumentOutcome::Priced(PriceQuote::new(inst.clone(), *price))
            }
            None => InstrumentOutcome::Failed(inst.clone()),
        })
        .collect();
    CycleResult::new(outcomes)
}
