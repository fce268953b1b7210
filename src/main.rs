use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use skyproxy::{cli, config, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;
    init_tracing(cfg.json_logs)?;

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::Token) => check_token(cfg).await,
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

/// Logs go to stdout (text, or JSON with SKYPROXY_LOG_FORMAT=json).
/// Traces are additionally exported over OTLP when OTEL_EXPORTER_OTLP_ENDPOINT is set.
fn init_tracing(json_logs: bool) -> anyhow::Result<()> {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    let telemetry_layer = if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "skyproxy"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "skyproxy=debug,tower_http=debug".into()),
        ))
        .with(fmt_layer)
        .with(telemetry_layer)
        .init();

    Ok(())
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    tracing::info!(
        api = %cfg.api_url,
        frontend_origin = %cfg.frontend_origin,
        "starting skyproxy"
    );
    let state = Arc::new(AppState::new(cfg)?);
    server::run(state, port).await
}

async fn check_token(cfg: config::Config) -> anyhow::Result<()> {
    let state = AppState::new(cfg)?;
    let auth = state.opensky.authenticator();

    auth.refresh().await?;
    match auth.cache().expires_at().await {
        Some(expires_at) => println!("Access token obtained.\n  Valid until: {}", expires_at),
        None => anyhow::bail!("token endpoint answered but no token was cached"),
    }
    Ok(())
}
