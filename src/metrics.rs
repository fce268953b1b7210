//! Prometheus metrics for skyproxy.
//!
//! Exposes a standard `/metrics` endpoint that Prometheus can scrape.
//! Each `Metrics` owns its registry, so several app instances (tests) never
//! collide on metric names.

use std::time::Duration;

use prometheus::{
    histogram_opts, opts, Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    upstream_requests_total: IntCounterVec,
    upstream_duration_seconds: HistogramVec,
    token_refreshes_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let upstream_requests_total = IntCounterVec::new(
            opts!(
                "skyproxy_upstream_requests_total",
                "Flight endpoint calls by outcome"
            ),
            &["endpoint", "outcome"],
        )?;

        let upstream_duration_seconds = HistogramVec::new(
            histogram_opts!(
                "skyproxy_upstream_duration_seconds",
                "Time spent serving a flight endpoint, upstream calls included",
                vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            ),
            &["endpoint"],
        )?;

        let token_refreshes_total = IntCounterVec::new(
            opts!(
                "skyproxy_token_refreshes_total",
                "OAuth2 token requests by result"
            ),
            &["result"],
        )?;

        registry.register(Box::new(upstream_requests_total.clone()))?;
        registry.register(Box::new(upstream_duration_seconds.clone()))?;
        registry.register(Box::new(token_refreshes_total.clone()))?;

        Ok(Self {
            registry,
            upstream_requests_total,
            upstream_duration_seconds,
            token_refreshes_total,
        })
    }

    /// Record one served call of a flight endpoint.
    pub fn observe(&self, endpoint: &str, outcome: &str, elapsed: Duration) {
        self.upstream_requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
        self.upstream_duration_seconds
            .with_label_values(&[endpoint])
            .observe(elapsed.as_secs_f64());
    }

    pub fn token_refresh(&self, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.token_refreshes_total.with_label_values(&[result]).inc();
    }

    /// Encode all metrics of this registry as Prometheus text format.
    pub fn encode(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .unwrap_or_default();
        String::from_utf8(buffer).unwrap_or_default()
    }
}
