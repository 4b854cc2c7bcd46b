mod api;
mod config;
mod export;
mod generation;
mod report;

use crate::api::{build_api, AppState};
use crate::config::AppConfig;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casegen=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {}", config.bind_addr, err);
            return ExitCode::FAILURE;
        }
    };
    info!("listening on {}", config.bind_addr);

    // No remote client ships with the service; generations answer 503 until one is wired in.
    let router = build_api(AppState::new(config, None));
    if let Err(err) = axum::serve(listener, router).await {
        error!("server stopped: {}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
