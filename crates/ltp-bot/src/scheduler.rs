//! Fixed-interval scheduling of the polling pipeline.
//!
//! The scheduler is an explicit state machine:
//! `Idle -> RunningCycle -> Sleeping -> RunningCycle -> ...`, terminal
//! only on shutdown. Each cycle runs resolver, fetcher, formatter and
//! notifier in sequence; no component failure escapes the cycle
//! boundary, so one bad cycle never aborts the process. The next tick is
//! scheduled from cycle end: a slow cycle adds to, not subtracts from,
//! the configured interval.

use ltp_catalog::InstrumentResolver;
use ltp_core::InstrumentOutcome;
use ltp_feed::PriceFetcher;
use ltp_notify::{AlertFormatter, DeliveryOutcome, Notifier};
use ltp_telemetry::Metrics;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Scheduler state, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningCycle,
    Sleeping,
}

/// Typed result of one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every instrument priced and the alert delivered.
    Success,
    /// Some instruments failed to price, or delivery did not succeed;
    /// an alert was still produced and attempted.
    Partial { failed_quotes: usize },
    /// No instrument priced at all. An all-failure alert was still sent.
    Failed,
}

impl CycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial { .. } => "partial",
            Self::Failed => "failed",
        }
    }
}

/// Drives resolve -> fetch -> format -> notify once per interval.
pub struct Scheduler {
    symbols: Vec<String>,
    interval: Duration,
    resolver: InstrumentResolver,
    fetcher: PriceFetcher,
    formatter: AlertFormatter,
    notifier: Box<dyn Notifier>,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(
        symbols: Vec<String>,
        interval: Duration,
        resolver: InstrumentResolver,
        fetcher: PriceFetcher,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            symbols,
            interval,
            resolver,
            fetcher,
            formatter: AlertFormatter::new(),
            notifier,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run cycles until the shutdown future resolves.
    ///
    /// Shutdown is only observed between cycles: a cycle in flight
    /// completes (or fails) naturally before the loop exits.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        info!(
            symbols = self.symbols.len(),
            interval_secs = self.interval.as_secs(),
            "Scheduler starting"
        );

        tokio::pin!(shutdown);

        loop {
            self.state = SchedulerState::RunningCycle;
            let outcome = self.run_cycle().await;
            info!(outcome = outcome.as_str(), "Cycle complete");

            self.state = SchedulerState::Sleeping;
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping scheduler");
                    return;
                }
            }
        }
    }

    /// Execute one full cycle.
    ///
    /// Every stage degrades rather than propagates: the resolver falls
    /// back to raw symbols, the fetcher marks instruments failed, and the
    /// notifier classifies delivery problems. Exactly one alert is
    /// produced and attempted per cycle, even when every quote failed.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let started = Instant::now();

        let instruments = self.resolver.resolve(&self.symbols).await;
        Metrics::catalog_loaded(self.resolver.catalog_loaded());

        let result = self.fetcher.fetch(&instruments).await;
        for outcome in &result.outcomes {
            if let InstrumentOutcome::Failed(inst) = outcome {
                Metrics::quote_failed(&inst.symbol);
            }
        }

        let message = self.formatter.format(&result);
        let delivery = self.notifier.send(&message).await;
        match &delivery {
            DeliveryOutcome::Delivered => Metrics::delivery("delivered"),
            DeliveryOutcome::Rejected { status } => {
                error!(status, "Alert rejected; not retrying this cycle");
                Metrics::delivery("rejected");
            }
            DeliveryOutcome::TransientFailure => {
                // The next cycle's fresh message is the retry
                Metrics::delivery("transient");
            }
        }

        let outcome = if result.is_total_failure() {
            CycleOutcome::Failed
        } else if result.failed_count() > 0 || !delivery.is_delivered() {
            CycleOutcome::Partial {
                failed_quotes: result.failed_count(),
            }
        } else {
            CycleOutcome::Success
        };

        Metrics::cycle_completed(outcome.as_str(), started.elapsed().as_secs_f64());
        outcome
    }
}
