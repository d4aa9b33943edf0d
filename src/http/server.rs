//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with auxiliary endpoints and the proxy fallback
//! - Wire up middleware (request ID, tracing, DASH parameter capture)
//! - Own the shared origin health record and, when allowed, its monitor
//! - Serve on a listener until shutdown
//!
//! # Design Decisions
//! - One router for every hosting mode; capability flags decide whether
//!   the monitor runs and whether `run` is used at all
//! - Hosts that cannot listen directly embed `into_router()`, or
//!   `into_invocation_router()` for per-invocation serving

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::validation::{parse_origin, ValidationError};
use crate::config::ProxyConfig;
use crate::health::{HealthMonitor, HealthState, HealthStatus};
use crate::http::origin::OriginClient;
use crate::http::request::{capture_dash_params, propagate_request_id_layer, set_request_id_layer};
use crate::http::{handlers, invocation, proxy};
use crate::lifecycle::shutdown;
use crate::manifest::ManifestRewriter;
use crate::routing::Router as ProxyRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub origin: OriginClient,
    pub rewriter: Arc<ManifestRewriter>,
    pub health: Arc<HealthState>,
    /// Origin base URL as configured, reported by `/health`.
    pub target: Arc<str>,
    pub max_body_size: usize,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid origin: {0}")]
    Origin(#[from] ValidationError),

    #[error("failed to build origin client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the steering proxy.
pub struct HttpServer {
    state: AppState,
    monitor: Option<Arc<HealthMonitor>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let target = parse_origin(&config.origin.base_url)?;
        let origin = OriginClient::new(target.clone())?;

        let background_polling = config.runtime.background_polling;
        let health = Arc::new(HealthState::new(HealthStatus::initial(background_polling)));

        let monitor = background_polling.then(|| {
            Arc::new(HealthMonitor::new(
                Arc::clone(&health),
                target,
                origin.client().clone(),
                config.health_check.clone(),
            ))
        });

        let state = AppState {
            router: Arc::new(ProxyRouter::new()),
            origin,
            rewriter: Arc::new(ManifestRewriter::from_config(&config.steering)),
            health,
            target: Arc::from(config.origin.base_url.as_str()),
            max_body_size: config.listener.max_body_size,
        };

        Ok(Self { state, monitor })
    }

    pub fn health(&self) -> &Arc<HealthState> {
        &self.state.health
    }

    /// The background monitor, absent when polling is disabled.
    pub fn monitor(&self) -> Option<&Arc<HealthMonitor>> {
        self.monitor.as_ref()
    }

    /// The fully layered router, for hosts that drive requests themselves.
    pub fn into_router(self) -> Router {
        Self::build_router(self.state)
    }

    /// Router for short-lived invocation hosts: same routes, handler
    /// failures answered with a 500 JSON body.
    pub fn into_invocation_router(self) -> Router {
        if self.monitor.is_some() {
            tracing::warn!("Background polling is enabled but the monitor never runs in invocation hosts");
        }
        Self::build_router(self.state).layer(invocation::catch_handler_failures())
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/jwt/encode",
                get(handlers::jwt_encode_query).post(handlers::jwt_encode_body),
            )
            .route(
                "/jwt/generate",
                get(handlers::jwt_generate_query).post(handlers::jwt_generate_body),
            )
            .route("/dash-params", get(handlers::dash_params))
            .route("/dash-jwt", get(handlers::dash_jwt))
            .fallback(proxy::proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn(capture_dash_params))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener, until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            target = %self.state.target,
            "HTTP server starting"
        );

        match &self.monitor {
            Some(monitor) => {
                let monitor = Arc::clone(monitor);
                let rx = shutdown.resubscribe();
                tokio::spawn(async move {
                    monitor.run(rx).await;
                });
            }
            None => tracing::info!("Background polling disabled, origin health seeded healthy"),
        }

        let app = Self::build_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
