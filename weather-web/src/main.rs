//! Binary crate for the `weather-web` server.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_core::{Config, OpenWeatherProvider, Settings, config::API_KEY_ENV};

mod routes;

#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Weather lookup web server")]
struct Args {
    /// Listen address; overrides `bind` from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load()?;
    let settings = Settings::resolve(&config);

    if settings.credential.is_none() {
        warn!("{API_KEY_ENV} is not set; every lookup will report a missing API key");
    }

    let bind = args.bind.unwrap_or_else(|| settings.bind.clone());
    let state = routes::AppState {
        provider: Arc::new(OpenWeatherProvider::new(&settings.base_url)),
        credential: settings.credential,
    };

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("listening on http://{bind}");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
