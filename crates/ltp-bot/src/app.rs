//! Component wiring.

use crate::config::{BotConfig, Secrets};
use crate::error::AppResult;
use crate::scheduler::Scheduler;
use ltp_auth::Authenticator;
use ltp_catalog::{CatalogClient, InstrumentResolver};
use ltp_core::Credentials;
use ltp_feed::PriceFetcher;
use ltp_notify::TelegramNotifier;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Main application: builds the pipeline from validated configuration
/// and runs the scheduler until a termination signal.
pub struct Application {
    scheduler: Scheduler,
}

impl Application {
    /// Build all components.
    ///
    /// Credential validation happens here; any missing material aborts
    /// startup before the first cycle.
    pub fn new(config: BotConfig, secrets: Secrets) -> AppResult<Self> {
        let credentials = Credentials::new(
            secrets.access_token,
            secrets.api_secret,
            config.auth_method,
        );
        let authenticator = Arc::new(Authenticator::new(credentials)?);

        let catalog_client = CatalogClient::new(&config.catalog_url)?;
        let resolver = InstrumentResolver::new(Box::new(catalog_client), config.aliases.clone());

        let fetcher = PriceFetcher::new(&config.api_base, authenticator)?;

        let notifier = TelegramNotifier::new(
            &config.telegram_api_base,
            &secrets.telegram_token,
            &config.telegram_chat_id,
        )?;

        info!(
            symbols = ?config.symbols,
            auth_method = %config.auth_method,
            poll_interval_secs = config.poll_interval_secs,
            "Application configured"
        );

        Ok(Self {
            scheduler: Scheduler::new(
                config.symbols,
                Duration::from_secs(config.poll_interval_secs),
                resolver,
                fetcher,
                Box::new(notifier),
            ),
        })
    }

    /// Run until a Ctrl-C / termination signal.
    pub async fn run(self) -> AppResult<()> {
        self.scheduler
            .run(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await;
        Ok(())
    }
}
