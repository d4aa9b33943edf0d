//! Content-steering reverse proxy.
//!
//! Sits in front of a video-packaging origin. Manifests are fetched whole,
//! upgraded and given a content-steering directive; everything else is
//! forwarded untouched.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server ──┬─▶ http::handlers   (/health, /jwt/*, /dash-*)
//!                               │        │
//!                               │        └─▶ steering (payload, token codec)
//!                               │
//!                               └─▶ http::proxy ──▶ routing::Router::classify
//!                                        │
//!                                        ├─ Manifest    ─▶ origin ─▶ manifest::ManifestRewriter
//!                                        └─ Passthrough ─▶ origin (streamed)
//!
//!     health::HealthMonitor ──(HEAD every interval)──▶ origin
//!              │
//!              └─▶ health::HealthState ◀── /health
//! ```
//!
//! # Configuration
//! - `STEERING_PROXY_CONFIG`: optional TOML file
//! - `PROXY_TARGET`: origin base URL (required unless set in the file)
//! - `STEERING_PROXY_BIND`, `STEERING_PROXY_CONSTRAINED`,
//!   `STEERING_PROXY_LISTEN_DIRECTLY`

use tokio::net::TcpListener;

use steering_proxy::config;
use steering_proxy::http::HttpServer;
use steering_proxy::lifecycle::{signals, Shutdown};
use steering_proxy::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "steering-proxy starting"
    );
    tracing::info!(
        target = %config.origin.base_url,
        bind_address = %config.listener.bind_address,
        background_polling = config.runtime.background_polling,
        health_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );

    if !config.runtime.listen_directly {
        tracing::error!(
            "listen_directly is disabled; run steering-proxy-lambda (feature `lambda`) or embed HttpServer::into_invocation_router()"
        );
        return Err("this host does not listen directly".into());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
