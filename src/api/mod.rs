use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::AppState;

pub mod handlers;

/// Build the flight API router.
/// All routes are relative: the caller mounts this under `/api`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/flights", get(handlers::list_flights))
        .route("/flights/:icao24", get(handlers::get_flight))
        .fallback(fallback_404)
}

async fn fallback_404() -> StatusCode {
    StatusCode::NOT_FOUND
}
