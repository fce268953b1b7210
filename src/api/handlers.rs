use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::UpstreamError;
use crate::models::flight::{FlightDetail, FlightsResponse};
use crate::AppState;

/// Metric label for a successful upstream call. Failures use `UpstreamError::kind`,
/// so both endpoints share one label set.
const SUCCESS: &str = "success";

/// GET /api/flights: live aircraft for the map.
/// Always answers 200; failures are reported through `status`.
pub async fn list_flights(State(state): State<Arc<AppState>>) -> Json<FlightsResponse> {
    let started = Instant::now();

    let (response, outcome) = match state.opensky.live_flights().await {
        Ok(data) => (FlightsResponse::success(data), SUCCESS),
        Err(e) => {
            log_failure("flights", &e);
            (FlightsResponse::status_only(e.flight_status()), e.kind())
        }
    };

    state.metrics.observe("flights", outcome, started.elapsed());
    Json(response)
}

/// GET /api/flights/:icao24: last known departure/arrival of one aircraft.
/// `icao24` is forwarded as given.
pub async fn get_flight(
    State(state): State<Arc<AppState>>,
    Path(icao24): Path<String>,
) -> Json<FlightDetail> {
    let started = Instant::now();

    let (detail, outcome) = match state.opensky.latest_flight(&icao24).await {
        Ok(detail) => (detail, SUCCESS),
        Err(e) => {
            log_failure("flight_detail", &e);
            (e.flight_detail(), e.kind())
        }
    };

    state
        .metrics
        .observe("flight_detail", outcome, started.elapsed());
    Json(detail)
}

fn log_failure(endpoint: &str, e: &UpstreamError) {
    match e {
        UpstreamError::Empty => tracing::debug!(endpoint, "OpenSky returned no data"),
        UpstreamError::RateLimited => tracing::warn!(endpoint, "OpenSky rate limit hit"),
        UpstreamError::MissingCredentials | UpstreamError::Unauthenticated => {
            tracing::warn!(endpoint, "no OpenSky access token: {}", e)
        }
        UpstreamError::Status(status) => {
            tracing::warn!(endpoint, status = status.as_u16(), "OpenSky API error")
        }
        _ => tracing::error!(endpoint, "backend processing error: {}", e),
    }
}
