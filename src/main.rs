use std::net::SocketAddr;

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use spotfinder::config::Config;
use spotfinder::{build_router, database, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Connecting to database: {}", config.database_url);
    let pool = match database::connect(&config.database_url).await {
        Ok(p) => p,
        Err(e) => {
            error!("Could not open database: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&config, pool) {
        Ok(s) => s,
        Err(e) => {
            error!("Could not build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    info!(source = state.places.source_name(), "📍 Place source ready");

    let app = build_router(state);

    // Fall back to the next port when the configured one is taken.
    let listener = match bind(&config.host, config.port).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = config.port.saturating_add(1);
            warn!(
                "Could not bind {}:{}: {}. Trying fallback {}:{}",
                config.host, config.port, e, config.host, fallback
            );
            match bind(&config.host, fallback).await {
                Ok(l) => l,
                Err(e) => {
                    error!("Could not bind fallback port: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match listener.local_addr() {
        Ok(addr) => info!("🚀 Server running on http://{}", addr),
        Err(e) => warn!("Server running, local address unknown: {}", e),
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shut down");
}

async fn bind(host: &str, port: u16) -> std::io::Result<tokio::net::TcpListener> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    tokio::net::TcpListener::bind(addr).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
