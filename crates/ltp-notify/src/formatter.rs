//! Renders a cycle result into one alert line.

use ltp_core::{AlertMessage, CycleResult, InstrumentOutcome, Price};
use std::collections::HashMap;

/// Delimiter between per-symbol entries.
const DELIMITER: &str = " | ";

/// Explicit marker for instruments that failed to price this cycle.
const FAILURE_MARKER: &str = "N/A";

/// Formats cycle results as `SYMBOL: price | SYMBOL: N/A | ...`.
///
/// Keeps the previous cycle's prices so successful entries can carry a
/// change annotation, e.g. `RELIANCE: 2500.50 (+12.30, +0.49%)`. The
/// cache is in-memory only and keyed by trading identifier, so a symbol
/// that flips between fallback and catalog identity starts a fresh
/// change baseline.
#[derive(Default)]
pub struct AlertFormatter {
    last_prices: HashMap<(String, String), Price>,
}

impl AlertFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render exactly one message for the cycle, regardless of how many
    /// quotes failed. Entries follow the result's (configured) order.
    pub fn format(&mut self, result: &CycleResult) -> AlertMessage {
        let entries: Vec<String> = result
            .outcomes
            .iter()
            .map(|outcome| self.render_entry(outcome))
            .collect();

        // Update the change baseline only after rendering the whole line
        for outcome in &result.outcomes {
            if let InstrumentOutcome::Priced(quote) = outcome {
                self.last_prices.insert(
                    instrument_key(outcome),
                    quote.ltp,
                );
            }
        }

        AlertMessage {
            text: entries.join(DELIMITER),
            cycle_timestamp: result.started_at,
        }
    }

    fn render_entry(&self, outcome: &InstrumentOutcome) -> String {
        match outcome {
            InstrumentOutcome::Failed(inst) => format!("{}: {}", inst.symbol, FAILURE_MARKER),
            InstrumentOutcome::Priced(quote) => {
                let symbol = &quote.instrument.symbol;
                match self.last_prices.get(&instrument_key(outcome)) {
                    Some(prev) => match quote.ltp.pct_from(*prev) {
                        Some(pct) => {
                            let diff = quote.ltp.diff_from(*prev);
                            format!(
                                "{}: {} ({}{:.2}, {}{:.2}%)",
                                symbol,
                                quote.ltp,
                                sign_prefix(diff),
                                diff,
                                sign_prefix(pct),
                                pct,
                            )
                        }
                        None => format!("{}: {}", symbol, quote.ltp),
                    },
                    None => format!("{}: {}", symbol, quote.ltp),
                }
            }
        }
    }
}

fn instrument_key(outcome: &InstrumentOutcome) -> (String, String) {
    let inst = outcome.instrument();
    (
        inst.segment.as_wire().to_string(),
        inst.trading_identifier.clone(),
    )
}

fn sign_prefix(value: rust_decimal::Decimal) -> &'static str {
    if value.is_sign_negative() {
        ""
    } else {
        "+"
    }
}
