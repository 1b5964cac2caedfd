//! Header construction for the configured authentication scheme.

use crate::error::{AuthError, AuthResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use ltp_core::{AuthMethod, Credentials};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use sha2::Sha256;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const HEADER_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
const HEADER_SIGNATURE: HeaderName = HeaderName::from_static("x-signature");
const HEADER_TIMESTAMP: HeaderName = HeaderName::from_static("x-timestamp");
const HEADER_NONCE: HeaderName = HeaderName::from_static("x-nonce");

/// Builds authorization headers for outbound provider requests.
///
/// Constructed once at startup from validated credentials; a missing
/// secret for the hmac/basic schemes is rejected here, before the
/// scheduler starts.
pub struct Authenticator {
    credentials: Credentials,
    nonce_counter: AtomicU64,
}

impl Authenticator {
    pub fn new(credentials: Credentials) -> AuthResult<Self> {
        credentials
            .validate()
            .map_err(|e| AuthError::MissingCredential(e.to_string()))?;

        debug!(method = %credentials.method, "Authenticator initialized");
        Ok(Self {
            credentials,
            nonce_counter: AtomicU64::new(1),
        })
    }

    /// Build the header set for a request with the given method and path.
    pub fn headers(&self, method: &str, path: &str) -> AuthResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        match self.credentials.method {
            AuthMethod::Bearer => {
                let value = format!("Bearer {}", self.credentials.access_token.expose());
                headers.insert(AUTHORIZATION, sensitive_value(&value)?);
            }
            AuthMethod::Hmac => {
                let timestamp = Utc::now().timestamp_millis();
                let nonce = self.next_nonce();
                let signature = self.sign(method, path, timestamp, &nonce)?;

                headers.insert(
                    HEADER_API_KEY,
                    sensitive_value(self.credentials.access_token.expose())?,
                );
                headers.insert(HEADER_SIGNATURE, plain_value(&signature)?);
                headers.insert(HEADER_TIMESTAMP, plain_value(&timestamp.to_string())?);
                headers.insert(HEADER_NONCE, plain_value(&nonce)?);
            }
            AuthMethod::Basic => {
                // validate() guarantees the secret is present for basic
                let secret = self
                    .credentials
                    .secret
                    .as_ref()
                    .ok_or_else(|| AuthError::MissingCredential("API secret".to_string()))?;
                let encoded = BASE64.encode(format!(
                    "{}:{}",
                    self.credentials.access_token.expose(),
                    secret.expose()
                ));
                headers.insert(AUTHORIZATION, sensitive_value(&format!("Basic {encoded}"))?);
            }
        }

        Ok(headers)
    }

    /// Compute the HMAC-SHA256 signature over the canonical string.
    ///
    /// Canonical form: `"{METHOD}\n{path}\n{timestamp}\n{nonce}"`, keyed
    /// by the API secret, hex-encoded. Deterministic for fixed inputs so
    /// the provider can recompute it.
    pub fn sign(&self, method: &str, path: &str, timestamp: i64, nonce: &str) -> AuthResult<String> {
        let secret = self
            .credentials
            .secret
            .as_ref()
            .ok_or_else(|| AuthError::MissingCredential("API secret".to_string()))?;

        let canonical = format!("{}\n{}\n{}\n{}", method.to_uppercase(), path, timestamp, nonce);

        let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
            .map_err(|e| AuthError::Signing(format!("invalid HMAC key length: {e}")))?;
        mac.update(canonical.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn next_nonce(&self) -> String {
        let seq = self.nonce_counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default(), seq)
    }
}

fn plain_value(value: &str) -> AuthResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AuthError::InvalidHeader(e.to_string()))
}

fn sensitive_value(value: &str) -> AuthResult<HeaderValue> {
    let mut hv = plain_value(value)?;
    hv.set_sensitive(true);
    Ok(hv)
}
