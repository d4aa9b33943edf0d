//! Entry point for short-lived invocation hosts (AWS Lambda).
//!
//! Each invocation is served by the same router as the standalone binary.
//! No background task is scheduled and no listener is bound; origin
//! health is reported as seeded.

use steering_proxy::config;
use steering_proxy::http::HttpServer;
use steering_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    let mut config = config::load_from_env()?;
    config.runtime.background_polling = false;
    config.runtime.listen_directly = false;

    logging::init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        target = %config.origin.base_url,
        "steering-proxy invocation host starting"
    );

    let router = HttpServer::new(config)?.into_invocation_router();
    lambda_http::run(router).await
}
