//! LTP alert bot entry point.
//!
//! Polls last-traded prices for a configured symbol set and forwards one
//! consolidated alert line per cycle to a Telegram chat.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// LTP polling and alerting bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via LTP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    ltp_telemetry::init_logging()?;

    info!("Starting LTP bot v{}", env!("CARGO_PKG_VERSION"));

    // Config path precedence: CLI arg > LTP_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var(ltp_bot::config::CONFIG_ENV).ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = ltp_bot::BotConfig::load(&config_path)?;

    // Missing secrets abort here, before the scheduler starts
    let secrets = ltp_bot::Secrets::from_env()?;

    let app = ltp_bot::Application::new(config, secrets)?;
    app.run().await?;

    Ok(())
}
