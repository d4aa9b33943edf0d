//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use steering_proxy::config::ProxyConfig;
use steering_proxy::health::HealthState;
use steering_proxy::http::HttpServer;
use steering_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A proxy running on an ephemeral port. Dropping it shuts it down.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub health: Arc<HealthState>,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing at `origin`, with background polling off so mocks only
/// see the requests a test makes.
pub fn test_config(origin: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.origin.base_url = origin.to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.runtime.background_polling = false;
    config.observability.metrics_enabled = false;
    config
}

/// Start the proxy with `config` and return once it is accepting.
pub async fn spawn_proxy(config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("valid test config");
    let health = Arc::clone(server.health());

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestProxy {
        addr,
        health,
        shutdown,
    }
}

/// Client that never goes through a system proxy and never follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
