//! Per-cycle data flow types.
//!
//! One polling cycle produces a `CycleResult` (quotes plus failures,
//! ordered by configured symbol) which is rendered into exactly one
//! `AlertMessage`.

use crate::decimal::Price;
use crate::instrument::ResolvedInstrument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successfully priced instrument for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// The instrument this quote belongs to.
    pub instrument: ResolvedInstrument,
    /// Last traded price.
    pub ltp: Price,
    /// When the quote was received.
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(instrument: ResolvedInstrument, ltp: Price) -> Self {
        Self {
            instrument,
            ltp,
            as_of: Utc::now(),
        }
    }
}

/// Outcome of a single instrument within a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrumentOutcome {
    Priced(PriceQuote),
    Failed(ResolvedInstrument),
}

impl InstrumentOutcome {
    pub fn instrument(&self) -> &ResolvedInstrument {
        match self {
            Self::Priced(q) => &q.instrument,
            Self::Failed(i) => i,
        }
    }

    pub fn quote(&self) -> Option<&PriceQuote> {
        match self {
            Self::Priced(q) => Some(q),
            Self::Failed(_) => None,
        }
    }
}

/// The complete set of per-instrument outcomes for one polling tick.
///
/// Entries follow configured symbol order, not provider response order.
/// Never persisted past message formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Per-instrument outcomes in configured symbol order.
    pub outcomes: Vec<InstrumentOutcome>,
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
}

impl CycleResult {
    pub fn new(outcomes: Vec<InstrumentOutcome>) -> Self {
        Self {
            outcomes,
            started_at: Utc::now(),
        }
    }

    /// Every instrument failed, typically a total transport failure.
    pub fn all_failed(instruments: Vec<ResolvedInstrument>) -> Self {
        Self::new(
            instruments
                .into_iter()
                .map(InstrumentOutcome::Failed)
                .collect(),
        )
    }

    /// Number of successfully priced instruments.
    pub fn priced_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, InstrumentOutcome::Priced(_)))
            .count()
    }

    /// Number of failed instruments.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.priced_count()
    }

    pub fn is_total_failure(&self) -> bool {
        self.priced_count() == 0
    }
}

/// One consolidated notification per cycle.
///
/// A single joined text line, never split across multiple notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub text: String,
    pub cycle_timestamp: DateTime<Utc>,
}
