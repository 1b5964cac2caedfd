//! Authenticated last-traded-price queries.
//!
//! Issues batched LTP requests to the provider for a resolved instrument
//! set and assembles a per-cycle result that tolerates per-instrument
//! failures. A total transport failure degrades to an all-failed result
//! rather than an error, so a cycle always yields a message.

pub mod error;
pub mod fetcher;
mod wire;

pub use error::{FeedError, FeedResult};
pub use fetcher::{PriceFetcher, DEFAULT_API_BASE};
