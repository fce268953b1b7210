//! skyproxy: OpenSky Network proxy for the live flight map.
//!
//! Library crate shared by the binary and the integration tests in `tests/`.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod opensky;
pub mod server;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub config: config::Config,
    pub opensky: opensky::OpenSkyClient,
    pub metrics: metrics::Metrics,
}

impl AppState {
    pub fn new(config: config::Config) -> anyhow::Result<Self> {
        let metrics = metrics::Metrics::new()?;
        let opensky = opensky::OpenSkyClient::new(&config, metrics.clone())?;
        Ok(Self {
            config,
            opensky,
            metrics,
        })
    }
}
