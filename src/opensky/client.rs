//! HTTP client for the two OpenSky data endpoints the map uses.
//! Every call authenticates through the shared `Authenticator` first.
//! No retries: a failed call is reported and the frontend polls again.

use chrono::Utc;
use reqwest::StatusCode;

use crate::config::Config;
use crate::errors::UpstreamError;
use crate::metrics::Metrics;
use crate::models::flight::{FlightDetail, FlightSummary};
use crate::opensky::auth::Authenticator;
use crate::opensky::models::{summarize_state, FlightRecord, StatesResponse};

/// Flights shown on the map per poll.
pub const MAX_MAP_FLIGHTS: usize = 50;

/// How far back the per-aircraft history query reaches.
pub const HISTORY_LOOKBACK_SECS: i64 = 24 * 3600;

pub struct OpenSkyClient {
    http: reqwest::Client,
    api_url: String,
    auth: Authenticator,
}

impl OpenSkyClient {
    pub fn new(config: &Config, metrics: Metrics) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            auth: Authenticator::new(http.clone(), config, metrics),
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Current state vectors, truncated to the first `MAX_MAP_FLIGHTS` in
    /// upstream order and projected for the map. Entries past the cut are
    /// never inspected.
    pub async fn live_flights(&self) -> Result<Vec<FlightSummary>, UpstreamError> {
        let token = self.bearer_token().await?;

        let resp = self
            .http
            .get(format!("{}/states/all", self.api_url))
            .bearer_auth(token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(UpstreamError::RateLimited),
            status => return Err(UpstreamError::Status(status)),
        }

        let body = resp.bytes().await?;
        let payload: StatesResponse = serde_json::from_slice(&body)?;
        let states = payload.states.unwrap_or_default();
        if states.is_empty() {
            return Err(UpstreamError::Empty);
        }

        states
            .iter()
            .take(MAX_MAP_FLIGHTS)
            .map(summarize_state)
            .collect()
    }

    /// Departure and arrival airports of the last flight in the aircraft's
    /// 24-hour history. The history is taken to be in chronological order;
    /// a `null` body counts as no history.
    pub async fn latest_flight(&self, icao24: &str) -> Result<FlightDetail, UpstreamError> {
        let token = self.bearer_token().await?;

        let end = Utc::now().timestamp();
        let begin = end - HISTORY_LOOKBACK_SECS;

        let resp = self
            .http
            .get(format!("{}/flights/aircraft", self.api_url))
            .query(&[("icao24", icao24)])
            .query(&[("begin", begin), ("end", end)])
            .bearer_auth(token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(UpstreamError::RateLimited),
            status => return Err(UpstreamError::Status(status)),
        }

        let body = resp.bytes().await?;
        let flights: Option<Vec<FlightRecord>> = serde_json::from_slice(&body)?;
        flights
            .unwrap_or_default()
            .last()
            .map(FlightRecord::to_detail)
            .ok_or(UpstreamError::Empty)
    }

    async fn bearer_token(&self) -> Result<String, UpstreamError> {
        self.auth
            .get_access_token()
            .await
            .ok_or(UpstreamError::Unauthenticated)
    }
}
