//! Prometheus metrics for the polling pipeline.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration
//! fails it indicates a fatal configuration error (e.g., duplicate
//! metric names) that should crash at startup rather than fail silently.
//! These panics only occur during static initialization, never at
//! runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, register_int_gauge, CounterVec, Histogram, IntGauge,
};

/// Total completed polling cycles by outcome.
/// Labels: outcome (success/partial/failed)
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ltp_cycles_total",
        "Total completed polling cycles by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Total per-instrument quote failures.
pub static QUOTE_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ltp_quote_failures_total",
        "Total per-instrument quote failures",
        &["symbol"]
    )
    .unwrap()
});

/// Total alert delivery attempts by outcome.
/// Labels: outcome (delivered/rejected/transient)
pub static DELIVERIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ltp_deliveries_total",
        "Total alert delivery attempts by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Whether the instrument catalog has been loaded (1=loaded).
pub static CATALOG_LOADED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "ltp_catalog_loaded",
        "Instrument catalog load state (1=loaded)"
    )
    .unwrap()
});

/// Cycle duration in seconds.
pub static CYCLE_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "ltp_cycle_duration_seconds",
        "Polling cycle duration in seconds",
        vec![0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a completed cycle.
    pub fn cycle_completed(outcome: &str, duration_secs: f64) {
        CYCLES_TOTAL.with_label_values(&[outcome]).inc();
        CYCLE_DURATION_SECONDS.observe(duration_secs);
    }

    /// Record a per-instrument quote failure.
    pub fn quote_failed(symbol: &str) {
        QUOTE_FAILURES_TOTAL.with_label_values(&[symbol]).inc();
    }

    /// Record a delivery attempt outcome.
    pub fn delivery(outcome: &str) {
        DELIVERIES_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Update the catalog load state.
    pub fn catalog_loaded(loaded: bool) {
        CATALOG_LOADED.set(if loaded { 1 } else { 0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_record_without_panic() {
        Metrics::cycle_completed("success", 0.42);
        Metrics::cycle_completed("partial", 1.0);
        Metrics::quote_failed("TCS");
        Metrics::delivery("delivered");
        Metrics::catalog_loaded(true);

        assert!(CYCLES_TOTAL.with_label_values(&["success"]).get() >= 1.0);
    }
}
