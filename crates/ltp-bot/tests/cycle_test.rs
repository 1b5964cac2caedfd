//! Full-cycle integration tests.
//!
//! Wires a real resolver, fetcher and formatter against stub endpoints
//! and verifies the per-cycle contract: exactly one alert is produced
//! and handed to the notifier, no matter how badly the cycle went.

use async_trait::async_trait;
use ltp_auth::Authenticator;
use ltp_bot::{CycleOutcome, Scheduler};
use ltp_catalog::{CatalogError, CatalogIndex, CatalogResult, CatalogSource, InstrumentResolver};
use ltp_core::{AlertMessage, AuthMethod, Credentials};
use ltp_feed::PriceFetcher;
use ltp_notify::{DeliveryOutcome, Notifier};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

const SAMPLE_CSV: &str = "\
tradingsymbol,name,securityid,exchangesegment
RELIANCE,RELIANCE INDUSTRIES,2885,NSE_EQ
TCS,TATA CONSULTANCY SERVICES,11536,NSE_EQ
NIFTY,NIFTY 50,13,NSE_INDEX
";

// Connection refused immediately, so tests stay fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

struct InlineCatalog;

#[async_trait]
impl CatalogSource for InlineCatalog {
    async fn fetch(&self) -> CatalogResult<CatalogIndex> {
        CatalogIndex::parse(SAMPLE_CSV.as_bytes())
    }
}

struct BrokenCatalog;

#[async_trait]
impl CatalogSource for BrokenCatalog {
    async fn fetch(&self) -> CatalogResult<CatalogIndex> {
        Err(CatalogError::Fetch("unreachable".to_string()))
    }
}

/// Records every message it is asked to deliver.
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    outcome: DeliveryOutcome,
}

impl RecordingNotifier {
    fn new(outcome: DeliveryOutcome) -> (Self, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sent: sent.clone(),
                outcome,
            },
            sent,
        )
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &AlertMessage) -> DeliveryOutcome {
        self.sent.lock().unwrap().push(message.text.clone());
        self.outcome.clone()
    }
}

fn scheduler(
    catalog: Box<dyn CatalogSource>,
    notifier_outcome: DeliveryOutcome,
) -> (Scheduler, Arc<Mutex<Vec<String>>>) {
    let credentials = Credentials::new("test-token", None, AuthMethod::Bearer);
    let authenticator = Arc::new(Authenticator::new(credentials).unwrap());
    let fetcher = PriceFetcher::new(UNREACHABLE_API, authenticator).unwrap();
    let resolver = InstrumentResolver::new(catalog, HashMap::new());
    let (notifier, sent) = RecordingNotifier::new(notifier_outcome);

    let symbols = vec!["RELIANCE".to_string(), "TCS".to_string()];
    (
        Scheduler::new(
            symbols,
            Duration::from_secs(60),
            resolver,
            fetcher,
            Box::new(notifier),
        ),
        sent,
    )
}

/// An unreachable price provider still produces exactly one alert, with
/// every symbol marked as failed.
#[tokio::test]
async fn test_unreachable_provider_sends_one_all_failed_alert() {
    let (mut scheduler, sent) = scheduler(Box::new(InlineCatalog), DeliveryOutcome::Delivered);

    let outcome = scheduler.run_cycle().await;

    assert_eq!(outcome, CycleOutcome::Failed);
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], "RELIANCE: N/A | TCS: N/A");
}

/// A failing catalog does not abort the cycle either; symbols degrade to
/// raw identifiers and the alert still goes out.
#[tokio::test]
async fn test_catalog_failure_still_sends_alert() {
    let (mut scheduler, sent) = scheduler(Box::new(BrokenCatalog), DeliveryOutcome::Delivered);

    let outcome = scheduler.run_cycle().await;

    assert_eq!(outcome, CycleOutcome::Failed);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

/// Delivery rejection is classified, not retried within the cycle.
#[tokio::test]
async fn test_rejected_delivery_is_not_retried() {
    let (mut scheduler, sent) = scheduler(
        Box::new(InlineCatalog),
        DeliveryOutcome::Rejected { status: 403 },
    );

    scheduler.run_cycle().await;

    assert_eq!(sent.lock().unwrap().len(), 1);
}

/// The scheduler loop exits when the shutdown future resolves, after
/// completing the cycle in flight.
#[tokio::test]
async fn test_scheduler_stops_on_shutdown() {
    let (scheduler, sent) = scheduler(Box::new(InlineCatalog), DeliveryOutcome::Delivered);

    let run = scheduler.run(async {});
    timeout(Duration::from_secs(5), run)
        .await
        .expect("scheduler should stop promptly on shutdown");

    assert_eq!(sent.lock().unwrap().len(), 1);
}
