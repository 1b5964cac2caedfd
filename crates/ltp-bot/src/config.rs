//! Application configuration.
//!
//! Non-secret settings come from a TOML file with env-var overrides for
//! deploy-time tweaks; secrets come exclusively from the environment and
//! are validated once at startup. A missing required secret is a fatal
//! configuration error, never a per-cycle error.

use crate::error::{AppError, AppResult};
use ltp_core::AuthMethod;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Env var naming the config file (CLI arg takes precedence).
pub const CONFIG_ENV: &str = "LTP_CONFIG";

const ENV_SYMBOLS: &str = "LTP_SYMBOLS";
const ENV_CHAT_ID: &str = "LTP_TELEGRAM_CHAT_ID";
const ENV_POLL_INTERVAL: &str = "LTP_POLL_INTERVAL";
const ENV_ACCESS_TOKEN: &str = "LTP_ACCESS_TOKEN";
const ENV_API_SECRET: &str = "LTP_API_SECRET";
const ENV_TELEGRAM_TOKEN: &str = "LTP_TELEGRAM_TOKEN";

/// Non-secret application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Symbols to poll, in alert order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    /// Seconds between cycles, measured from cycle end.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Price provider API base.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Instrument catalog (scrip master) URL.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// Provider authentication scheme.
    #[serde(default)]
    pub auth_method: AuthMethod,
    /// Telegram destination chat id.
    #[serde(default)]
    pub telegram_chat_id: String,
    /// Telegram Bot API base (overridable for testing).
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,
    /// Symbol aliases applied before catalog lookup,
    /// e.g. `BANKNIFTY = "NIFTY BANK"`.
    #[serde(default = "default_aliases")]
    pub aliases: HashMap<String, String>,
}

fn default_symbols() -> Vec<String> {
    ["NIFTY 50", "BANKNIFTY", "TATAMOTORS", "RELIANCE", "TCS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_api_base() -> String {
    ltp_feed::DEFAULT_API_BASE.to_string()
}

fn default_catalog_url() -> String {
    ltp_catalog::DEFAULT_CATALOG_URL.to_string()
}

fn default_telegram_api_base() -> String {
    ltp_notify::TELEGRAM_API_BASE.to_string()
}

fn default_aliases() -> HashMap<String, String> {
    HashMap::from([
        ("BANKNIFTY".to_string(), "NIFTY BANK".to_string()),
        ("NIFTYBANK".to_string(), "NIFTY BANK".to_string()),
        ("CNX NIFTY".to_string(), "NIFTY 50".to_string()),
    ])
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            poll_interval_secs: default_poll_interval_secs(),
            api_base: default_api_base(),
            catalog_url: default_catalog_url(),
            auth_method: AuthMethod::default(),
            telegram_chat_id: String::new(),
            telegram_api_base: default_telegram_api_base(),
            aliases: default_aliases(),
        }
    }
}

impl BotConfig {
    /// Load configuration: file (if present) plus env overrides.
    pub fn load(path: &str) -> AppResult<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_overrides(
            std::env::var(ENV_SYMBOLS).ok(),
            std::env::var(ENV_CHAT_ID).ok(),
            std::env::var(ENV_POLL_INTERVAL).ok(),
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("failed to parse config: {e}")))
    }

    /// Apply environment overrides for the deploy-tweakable settings.
    pub fn apply_overrides(
        &mut self,
        symbols: Option<String>,
        chat_id: Option<String>,
        poll_interval: Option<String>,
    ) -> AppResult<()> {
        if let Some(raw) = symbols {
            self.symbols = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(chat_id) = chat_id {
            self.telegram_chat_id = chat_id;
        }
        if let Some(raw) = poll_interval {
            self.poll_interval_secs = raw
                .parse()
                .map_err(|e| AppError::Config(format!("invalid {ENV_POLL_INTERVAL}: {e}")))?;
        }
        Ok(())
    }

    /// Validate startup invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.symbols.is_empty() {
            return Err(AppError::Config("symbol list must not be empty".to_string()));
        }
        if self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::Config("symbol list contains an empty entry".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.telegram_chat_id.trim().is_empty() {
            return Err(AppError::Config(format!(
                "telegram chat id missing (set telegram_chat_id or {ENV_CHAT_ID})"
            )));
        }
        Ok(())
    }
}

/// Secret material, read from the environment only.
pub struct Secrets {
    pub access_token: String,
    pub api_secret: Option<String>,
    pub telegram_token: String,
}

impl Secrets {
    pub fn from_env() -> AppResult<Self> {
        let access_token = required_env(ENV_ACCESS_TOKEN)?;
        let telegram_token = required_env(ENV_TELEGRAM_TOKEN)?;
        let api_secret = std::env::var(ENV_API_SECRET)
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            access_token,
            api_secret,
            telegram_token,
        })
    }
}

fn required_env(name: &str) -> AppResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Config(format!(
            "required environment variable {name} is not set"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.poll_interval_secs, 60);
        assert!(!config.symbols.is_empty());
        // Chat id is required, so the bare default does not validate
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: BotConfig = toml::from_str(
            r#"
symbols = ["RELIANCE", "TCS"]
poll_interval_secs = 30
auth_method = "hmac"
telegram_chat_id = "-100200300"

[aliases]
BANKNIFTY = "NIFTY BANK"
"#,
        )
        .unwrap();

        assert_eq!(config.symbols, vec!["RELIANCE", "TCS"]);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.auth_method, AuthMethod::Hmac);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_symbol_override_parsing() {
        let mut config = BotConfig::default();
        config
            .apply_overrides(
                Some("NIFTY 50, RELIANCE ,,TCS".to_string()),
                Some("42".to_string()),
                None,
            )
            .unwrap();

        assert_eq!(config.symbols, vec!["NIFTY 50", "RELIANCE", "TCS"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_poll_interval_override() {
        let mut config = BotConfig::default();
        let result = config.apply_overrides(None, None, Some("sixty".to_string()));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = BotConfig::default();
        config.telegram_chat_id = "42".to_string();
        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_symbols_rejected() {
        let mut config = BotConfig::default();
        config.telegram_chat_id = "42".to_string();
        config.symbols.clear();
        assert!(config.validate().is_err());
    }
}
