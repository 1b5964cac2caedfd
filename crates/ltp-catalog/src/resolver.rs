//! Symbol resolution with a process-lifetime monotonic cache.
//!
//! The catalog is fetched on first use and never again once a fetch has
//! succeeded. Until then every cycle retries the fetch; in the meantime
//! all symbols degrade to identity fallback so the fetcher can still
//! attempt a best-effort query. Per-symbol results are cached for the
//! process lifetime; fallback entries produced before the catalog first
//! loaded are re-looked-up exactly once, when it does.

use crate::client::CatalogSource;
use crate::index::{normalize, CatalogIndex};
use ltp_core::ResolvedInstrument;
use std::collections::HashMap;
use tracing::{info, warn};

/// Resolves configured symbols to provider trading identifiers.
///
/// Exclusively owned by the scheduling loop; there is exactly one worker,
/// so no interior locking is needed.
pub struct InstrumentResolver {
    source: Box<dyn CatalogSource>,
    /// Alias map, normalized key -> canonical catalog symbol.
    aliases: HashMap<String, String>,
    /// Set after the first successful fetch, never replaced.
    catalog: Option<CatalogIndex>,
    /// Monotonic per-symbol cache keyed by configured symbol.
    cache: HashMap<String, ResolvedInstrument>,
}

impl InstrumentResolver {
    pub fn new(source: Box<dyn CatalogSource>, aliases: HashMap<String, String>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(k, v)| (normalize(&k), v))
            .collect();
        Self {
            source,
            aliases,
            catalog: None,
            cache: HashMap::new(),
        }
    }

    /// Whether the catalog has been fetched successfully.
    pub fn catalog_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    /// Resolve the configured symbols, in order.
    ///
    /// Returns exactly one `ResolvedInstrument` per input symbol: a
    /// catalog match or an identity fallback, never absent.
    pub async fn resolve(&mut self, symbols: &[String]) -> Vec<ResolvedInstrument> {
        self.ensure_catalog().await;

        symbols
            .iter()
            .map(|symbol| {
                if let Some(cached) = self.cache.get(symbol) {
                    return cached.clone();
                }
                let resolved = self.lookup(symbol);
                self.cache.insert(symbol.clone(), resolved.clone());
                resolved
            })
            .collect()
    }

    /// Fetch the catalog if it has never been fetched successfully.
    ///
    /// On the first success, previously cached fallback entries are
    /// dropped so the next lookup goes against the real catalog.
    async fn ensure_catalog(&mut self) {
        if self.catalog.is_some() {
            return;
        }

        match self.source.fetch().await {
            Ok(index) => {
                info!(instruments = index.len(), "Catalog loaded");
                self.cache.retain(|_, inst| !inst.is_fallback);
                self.catalog = Some(index);
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed; falling back to raw symbols this cycle");
            }
        }
    }

    fn lookup(&self, symbol: &str) -> ResolvedInstrument {
        let Some(catalog) = &self.catalog else {
            return ResolvedInstrument::fallback(symbol);
        };

        let key = normalize(symbol);
        let canonical = self.aliases.get(&key).cloned().unwrap_or(key);

        match catalog.lookup(&canonical) {
            Some(entry) => ResolvedInstrument::resolved(
                symbol,
                entry.security_id.clone(),
                entry.segment.clone(),
            ),
            None => {
                warn!(symbol, "Symbol not found in catalog; using raw identifier");
                ResolvedInstrument::fallback(symbol)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CatalogSource;
    use crate::error::{CatalogError, CatalogResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SAMPLE_CSV: &str = "\
tradingsymbol,name,securityid,exchangesegment
RELIANCE,RELIANCE INDUSTRIES,2885,NSE_EQ
TCS,TATA CONSULTANCY SERVICES,11536,NSE_EQ
NIFTY,NIFTY 50,13,NSE_INDEX
NIFTY BANK,NIFTY BANK,25,NSE_INDEX
";

    struct StubSource {
        fail_first: usize,
        calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(fail_first: usize) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    fail_first,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl CatalogSource for StubSource {
        async fn fetch(&self) -> CatalogResult<CatalogIndex> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(CatalogError::Fetch("unreachable".to_string()));
            }
            CatalogIndex::parse(SAMPLE_CSV.as_bytes())
        }
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_returns_one_entry_per_symbol_in_order() {
        let (source, _) = StubSource::new(0);
        let mut resolver = InstrumentResolver::new(Box::new(source), HashMap::new());

        let resolved = resolver
            .resolve(&symbols(&["RELIANCE", "UNKNOWN", "TCS"]))
            .await;

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].trading_identifier, "2885");
        assert!(resolved[1].is_fallback);
        assert_eq!(resolved[1].trading_identifier, "UNKNOWN");
        assert_eq!(resolved[2].trading_identifier, "11536");
    }

    #[tokio::test]
    async fn test_catalog_fetched_at_most_once() {
        let (source, calls) = StubSource::new(0);
        let mut resolver = InstrumentResolver::new(Box::new(source), HashMap::new());

        let first = resolver.resolve(&symbols(&["RELIANCE"])).await;
        let second = resolver.resolve(&symbols(&["RELIANCE"])).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_fallback_and_retries() {
        let (source, calls) = StubSource::new(1);
        let mut resolver = InstrumentResolver::new(Box::new(source), HashMap::new());

        // First cycle: fetch fails, everything falls back
        let resolved = resolver.resolve(&symbols(&["RELIANCE", "TCS"])).await;
        assert!(!resolver.catalog_loaded());
        assert!(resolved.iter().all(|r| r.is_fallback));

        // Second cycle: fetch succeeds, fallbacks are re-resolved
        let resolved = resolver.resolve(&symbols(&["RELIANCE", "TCS"])).await;
        assert!(resolver.catalog_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolved[0].trading_identifier, "2885");
        assert_eq!(resolved[1].trading_identifier, "11536");

        // Third cycle: no further fetches
        resolver.resolve(&symbols(&["RELIANCE"])).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_miss_after_successful_fetch_stays_cached() {
        let (source, calls) = StubSource::new(0);
        let mut resolver = InstrumentResolver::new(Box::new(source), HashMap::new());

        let first = resolver.resolve(&symbols(&["NOSUCH"])).await;
        let second = resolver.resolve(&symbols(&["NOSUCH"])).await;

        assert!(first[0].is_fallback);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_alias_resolution() {
        let (source, _) = StubSource::new(0);
        let aliases = HashMap::from([("BANKNIFTY".to_string(), "NIFTY BANK".to_string())]);
        let mut resolver = InstrumentResolver::new(Box::new(source), aliases);

        let resolved = resolver.resolve(&symbols(&["banknifty"])).await;
        assert_eq!(resolved[0].trading_identifier, "25");
        // The configured spelling is preserved on the instrument
        assert_eq!(resolved[0].symbol, "banknifty");
    }
}
