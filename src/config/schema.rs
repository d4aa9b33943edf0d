//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the steering proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The packaging origin every request is forwarded to.
    pub origin: OriginConfig,

    /// Origin health probe settings.
    pub health_check: HealthCheckConfig,

    /// Capabilities of the hosting environment.
    pub runtime: RuntimeConfig,

    /// Content-steering directive injected into manifests.
    pub steering: SteeringConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,

    /// Maximum passthrough request body in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
            max_body_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Origin configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Base URL of the origin, e.g. "https://abc.mediapackage.eu-west-1.amazonaws.com".
    /// Request paths are appended to it.
    pub base_url: String,
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Interval between recurring probes in seconds.
    pub interval_secs: u64,

    /// Hard timeout for a single probe in milliseconds.
    pub timeout_ms: u64,

    /// User-Agent sent with probes.
    pub user_agent: String,
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            timeout_ms: 8_000,
            user_agent: "steering-proxy-health-check/1.0".to_string(),
        }
    }
}

/// Hosting capabilities.
///
/// Short-lived invocation hosts freeze the process between requests, so
/// background polling must be off there and health is reported as seeded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Run the recurring origin probe.
    pub background_polling: bool,

    /// Bind a TCP listener. When false, a host embeds the router instead.
    pub listen_directly: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            background_polling: true,
            listen_directly: true,
        }
    }
}

/// Content-steering directive configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Steering server URI players poll for pathway priority.
    pub server_uri: String,

    /// Pathway the player should start on.
    pub pathway_id: String,
}

impl SteeringConfig {
    /// The `#EXT-X-CONTENT-STEERING` line for manifests.
    pub fn directive(&self) -> String {
        format!(
            "#EXT-X-CONTENT-STEERING:SERVER-URI=\"{}\",PATHWAY-ID=\"{}\"",
            self.server_uri, self.pathway_id
        )
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            server_uri: concat!(
                "https://cloudfront.content-steering.com/hls.hcsm?steering_params=",
                "eyJjZG5PcmRlciI6WyJjZG4tYyIsImNkbi1hIiwiY2RuLWIiXSwibWluQml0cmF0ZSI6MTQy",
                "MDY5MiwicGF0aHdheXMiOlt7ImlkIjoiY2RuLWMiLCJ0aHJvdWdocHV0IjoyMDAwMDAwMH0s",
                "eyJpZCI6ImNkbi1hIiwidGhyb3VnaHB1dCI6MjAwMDAwMDB9LHsiaWQiOiJjZG4tYiIsInRo",
                "cm91Z2hwdXQiOjIwMDAwMDAwfV19",
            )
            .to_string(),
            pathway_id: "cdn-a".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
        assert_eq!(config.health_check.timeout(), Duration::from_secs(8));
        assert_eq!(config.health_check.interval(), Duration::from_secs(60));
        assert!(config.runtime.background_polling);
        assert!(config.origin.base_url.is_empty());
    }

    #[test]
    fn test_default_directive() {
        let directive = SteeringConfig::default().directive();
        assert!(directive.starts_with(
            "#EXT-X-CONTENT-STEERING:SERVER-URI=\"https://cloudfront.content-steering.com/hls.hcsm?steering_params=eyJj"
        ));
        assert!(directive.ends_with("fV19\",PATHWAY-ID=\"cdn-a\""));
    }

    #[test]
    fn test_partial_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [origin]
            base_url = "https://origin.example"

            [health_check]
            timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.origin.base_url, "https://origin.example");
        assert_eq!(config.health_check.timeout_ms, 250);
        assert_eq!(config.health_check.interval_secs, 60);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
    }
}
