//! Alert formatting and delivery.
//!
//! Renders one `CycleResult` into a single joined alert line and posts
//! it to the configured messaging endpoint, classifying the delivery
//! outcome so the scheduler can decide whether the next cycle's message
//! is a natural retry.

pub mod error;
pub mod formatter;
pub mod telegram;

pub use error::{NotifyError, NotifyResult};
pub use formatter::AlertFormatter;
pub use telegram::{DeliveryOutcome, Notifier, TelegramNotifier, TELEGRAM_API_BASE};
