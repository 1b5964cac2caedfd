//! Core domain types for the LTP alert bot.
//!
//! This crate provides the fundamental types used throughout the polling
//! pipeline:
//! - `Price`: precision-safe last-traded-price value
//! - `ExchangeSegment`, `ResolvedInstrument`: symbol resolution results
//! - `PriceQuote`, `CycleResult`, `AlertMessage`: per-cycle data flow
//! - `Credentials`, `AuthMethod`: provider authentication material

pub mod credentials;
pub mod cycle;
pub mod decimal;
pub mod error;
pub mod instrument;

pub use credentials::{AuthMethod, Credentials, SecretString};
pub use cycle::{AlertMessage, CycleResult, InstrumentOutcome, PriceQuote};
pub use decimal::Price;
pub use error::{CoreError, Result};
pub use instrument::{ExchangeSegment, ResolvedInstrument};
