//! Meetup API Server Entry Point
//!
//! Bootstraps telemetry and configuration, opens the record store, runs the
//! page build pass and starts the Axum HTTP server.

use meetup_api::telemetry::{init_tracing, set_metrics_enabled, TelemetryConfig};
use meetup_api::{build_site, create_api_router, open_store, ApiConfig, ApiError, ApiResult, DbConfig};
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;
    set_metrics_enabled(telemetry_config.metrics_enabled);

    let api_config = ApiConfig::from_env().map_err(fatal_config)?;
    let db_config = DbConfig::from_env().map_err(fatal_config)?;
    let addr = api_config.bind_addr().map_err(fatal_config)?;

    let store = open_store(&db_config).await?;
    let site = build_site(store, &api_config).await?;

    let app = create_api_router(site, &api_config);

    info!(%addr, "Starting meetup API server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    info!("Server shut down");
    Ok(())
}

fn fatal_config(err: meetup_core::ConfigError) -> ApiError {
    tracing::error!(error = %err, "Invalid configuration");
    ApiError::configuration_error(err.to_string())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
