//! Telegram delivery with outcome classification.

use crate::error::{NotifyError, NotifyResult};
use async_trait::async_trait;
use ltp_core::AlertMessage;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// Default Telegram Bot API base.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Classification of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Accepted by the messaging endpoint.
    Delivered,
    /// 4xx-class rejection (malformed, too long, unauthorized).
    /// Not retried this cycle.
    Rejected { status: u16 },
    /// 5xx-class or network failure. The next scheduled cycle's fresh
    /// message is the natural retry.
    TransientFailure,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Delivery port for formatted alerts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt delivery and classify the outcome. Never errors: every
    /// failure mode maps to a `DeliveryOutcome` variant.
    async fn send(&self, message: &AlertMessage) -> DeliveryOutcome;
}

/// Posts alert text to a Telegram chat via the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// The bot token becomes part of the request URL; it is never logged.
    pub fn new(
        api_base: impl Into<String>,
        bot_token: &str,
        chat_id: impl Into<String>,
    ) -> NotifyResult<Self> {
        let chat_id = chat_id.into();
        if chat_id.is_empty() {
            return Err(NotifyError::InvalidDestination(
                "chat id must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::HttpClient(format!("failed to create HTTP client: {e}")))?;

        let api_base = api_base.into();
        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                api_base.trim_end_matches('/'),
                bot_token
            ),
            chat_id,
        })
    }
}

/// Strip the request URL from a transport error before rendering it.
/// The URL embeds the bot token.
fn redact(e: reqwest::Error) -> reqwest::Error {
    e.without_url()
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &AlertMessage) -> DeliveryOutcome {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": message.text,
        });

        let response = match self.client.post(&self.send_url).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %redact(e), "Alert delivery failed (network)");
                return DeliveryOutcome::TransientFailure;
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(chars = message.text.len(), "Alert delivered");
            DeliveryOutcome::Delivered
        } else if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Alert rejected by endpoint");
            DeliveryOutcome::Rejected {
                status: status.as_u16(),
            }
        } else {
            warn!(status = status.as_u16(), "Alert delivery failed (server)");
            DeliveryOutcome::TransientFailure
        }
    }
}
