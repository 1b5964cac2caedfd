//! LTP polling and alerting bot.
//!
//! Wires the resolution-and-polling pipeline together and drives it on a
//! fixed interval: resolve configured symbols, fetch prices, format one
//! alert line, deliver it, sleep, repeat.

pub mod app;
pub mod config;
pub mod error;
pub mod scheduler;

pub use app::Application;
pub use config::{BotConfig, Secrets};
pub use error::{AppError, AppResult};
pub use scheduler::{CycleOutcome, Scheduler};
