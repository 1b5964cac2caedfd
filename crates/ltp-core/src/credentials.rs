//! Provider authentication material.
//!
//! Loaded once at startup, immutable afterwards, never logged. The
//! secret is zeroized on drop.

use crate::error::{CoreError, Result};
use serde::Deserialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Authentication scheme for outbound price-provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// `Authorization: Bearer <token>`.
    #[default]
    Bearer,
    /// HMAC-SHA256 signature over method/path/timestamp/nonce.
    Hmac,
    /// `Authorization: Basic base64(token:secret)`.
    Basic,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => write!(f, "bearer"),
            Self::Hmac => write!(f, "hmac"),
            Self::Basic => write!(f, "basic"),
        }
    }
}

/// Secret material that is zeroized on drop and redacted in Debug.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(***)")
    }
}

/// Provider credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API token (access token / key id, depending on scheme).
    pub access_token: SecretString,
    /// Optional API secret, required for `hmac` and `basic`.
    pub secret: Option<SecretString>,
    /// Selected authentication scheme.
    pub method: AuthMethod,
}

impl Credentials {
    pub fn new(
        access_token: impl Into<String>,
        secret: Option<String>,
        method: AuthMethod,
    ) -> Self {
        Self {
            access_token: SecretString::new(access_token),
            secret: secret.map(SecretString::new),
            method,
        }
    }

    /// Validate that the selected scheme has its required material.
    ///
    /// A missing credential here is a fatal startup configuration error,
    /// not a per-cycle error.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.expose().is_empty() {
            return Err(CoreError::Config("API token must not be empty".to_string()));
        }
        match self.method {
            AuthMethod::Bearer => Ok(()),
            AuthMethod::Hmac | AuthMethod::Basic => {
                if self.secret.as_ref().is_some_and(|s| !s.expose().is_empty()) {
                    Ok(())
                } else {
                    Err(CoreError::Config(format!(
                        "auth method '{}' requires an API secret",
                        self.method
                    )))
                }
            }
        }
    }
}
