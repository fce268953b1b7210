//! OAuth2 client-credentials authentication against the OpenSky identity provider.
//!
//! The bearer token is kept in a `TokenCache` owned by the authenticator and
//! reused until 60 seconds before the lifetime the provider declared.
//! The cache lock is never held across the token request: two requests that
//! find the token expired at the same moment may both authenticate, and the
//! later write wins. Any valid token is as good as another.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::errors::UpstreamError;
use crate::metrics::Metrics;
use crate::opensky::models::TokenResponse;

/// Seconds subtracted from the declared lifetime so a token is never sent
/// right as it expires.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

// Upper bound on a declared lifetime, keeps the date arithmetic in range.
const MAX_LIFETIME_SECS: f64 = 365.0 * 24.0 * 3600.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// `expires_in` may be fractional; it is kept to the millisecond.
    /// A non-finite lifetime is treated as already expired.
    pub fn issued(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let lifetime = if response.expires_in.is_finite() {
            response.expires_in.clamp(-MAX_LIFETIME_SECS, MAX_LIFETIME_SECS)
        } else {
            0.0
        };
        let lifetime = Duration::milliseconds((lifetime * 1000.0).round() as i64);
        Self {
            access_token: response.access_token,
            expires_at: issued_at + lifetime - Duration::seconds(EXPIRY_MARGIN_SECS),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Shared, cheaply-cloneable holder of the last issued token.
#[derive(Clone, Default)]
pub struct TokenCache(Arc<RwLock<Option<AccessToken>>>);

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token if it is still valid at `now`.
    pub async fn valid_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.0
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.access_token.clone())
    }

    pub async fn store(&self, token: AccessToken) {
        *self.0.write().await = Some(token);
    }

    /// Expiry of the cached token, valid or not.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.0.read().await.as_ref().map(|token| token.expires_at)
    }
}

struct Credentials {
    client_id: String,
    client_secret: String,
}

pub struct Authenticator {
    http: reqwest::Client,
    token_url: String,
    credentials: Option<Credentials>,
    cache: TokenCache,
    metrics: Metrics,
}

impl Authenticator {
    pub fn new(http: reqwest::Client, config: &Config, metrics: Metrics) -> Self {
        Self {
            http,
            token_url: config.auth_url.clone(),
            credentials: config.credentials().map(|(id, secret)| Credentials {
                client_id: id.to_string(),
                client_secret: secret.to_string(),
            }),
            cache: TokenCache::new(),
            metrics,
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Return a usable bearer token, authenticating only if the cached one is
    /// absent or expired. Failures are logged and reported as `None`; the next
    /// call tries again.
    pub async fn get_access_token(&self) -> Option<String> {
        if let Some(token) = self.cache.valid_at(Utc::now()).await {
            return Some(token);
        }

        match self.refresh().await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::error!("authentication error: {}", e);
                None
            }
        }
    }

    /// Unconditionally request a fresh token and cache it.
    pub async fn refresh(&self) -> Result<String, UpstreamError> {
        let result = self.request_token().await;
        self.metrics.token_refresh(result.is_ok());

        let token = result?;
        let access_token = token.access_token.clone();
        tracing::info!(expires_at = %token.expires_at, "obtained new OpenSky access token");
        self.cache.store(token).await;
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<AccessToken, UpstreamError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(UpstreamError::MissingCredentials)?;

        let issued_at = Utc::now();
        let body = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let response: TokenResponse = serde_json::from_slice(&body)?;
        Ok(AccessToken::issued(response, issued_at))
    }
}
