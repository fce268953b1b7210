use reqwest::StatusCode;
use thiserror::Error;

use crate::models::flight::{FlightDetail, FlightStatus};

/// Every way a call to OpenSky can fail.
///
/// Handlers never turn these into HTTP errors: the map endpoint folds them into
/// its `status` field and the detail endpoint into placeholder strings.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("client credentials are not configured")]
    MissingCredentials,

    #[error("no access token available")]
    Unauthenticated,

    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("upstream returned no data")]
    Empty,

    #[error("failed to decode upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UpstreamError {
    /// Status reported by `GET /api/flights` for this failure.
    pub fn flight_status(&self) -> FlightStatus {
        match self {
            UpstreamError::MissingCredentials | UpstreamError::Unauthenticated => {
                FlightStatus::AuthError
            }
            UpstreamError::RateLimited => FlightStatus::Limited,
            UpstreamError::Empty => FlightStatus::Empty,
            UpstreamError::Status(_)
            | UpstreamError::Decode(_)
            | UpstreamError::Malformed(_)
            | UpstreamError::Transport(_) => FlightStatus::Error,
        }
    }

    /// Reply of `GET /api/flights/:icao24` for this failure.
    /// Anything the upstream answered cleanly is "N/A"; broken exchanges are "Error".
    pub fn flight_detail(&self) -> FlightDetail {
        match self {
            UpstreamError::MissingCredentials
            | UpstreamError::Unauthenticated
            | UpstreamError::RateLimited
            | UpstreamError::Status(_)
            | UpstreamError::Empty => FlightDetail::unavailable(),
            UpstreamError::Decode(_) | UpstreamError::Malformed(_) | UpstreamError::Transport(_) => {
                FlightDetail::failed()
            }
        }
    }

    /// Short label used as the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::MissingCredentials => "missing_credentials",
            UpstreamError::Unauthenticated => "unauthenticated",
            UpstreamError::RateLimited => "rate_limited",
            UpstreamError::Status(_) => "status",
            UpstreamError::Empty => "empty",
            UpstreamError::Decode(_) => "decode",
            UpstreamError::Malformed(_) => "malformed",
            UpstreamError::Transport(_) => "transport",
        }
    }
}
