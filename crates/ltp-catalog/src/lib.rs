//! Instrument catalog download and symbol resolution.
//!
//! The provider hosts a large CSV "scrip master" mapping trading symbols
//! and instrument names to security ids and exchange segments. This crate
//! downloads and indexes it, and resolves configured symbols against it
//! with a process-lifetime monotonic cache and raw-symbol fallback.

pub mod client;
pub mod error;
pub mod index;
pub mod resolver;

pub use client::{CatalogClient, CatalogSource, DEFAULT_CATALOG_URL};
pub use error::{CatalogError, CatalogResult};
pub use index::{CatalogEntry, CatalogIndex};
pub use resolver::InstrumentResolver;
