//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the origin is an absolute http(s) URL
//! - Validate value ranges (interval and timeout > 0, bind address parses)

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Parse the configured origin base URL.
pub fn parse_origin(base_url: &str) -> Result<Url, ValidationError> {
    if base_url.trim().is_empty() {
        return Err(ValidationError::new(
            "origin.base_url",
            "must be set (PROXY_TARGET)",
        ));
    }
    let url = Url::parse(base_url.trim())
        .map_err(|e| ValidationError::new("origin.base_url", e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::new(
            "origin.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ValidationError::new("origin.base_url", "missing host"));
    }
    Ok(url)
}

/// Collect every semantic problem; an empty list means the config is usable.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = parse_origin(&config.origin.base_url) {
        errors.push(e);
    }

    if config.runtime.listen_directly
        && config.listener.bind_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::new("health_check.interval_secs", "must be > 0"));
    }
    if config.health_check.timeout_ms == 0 {
        errors.push(ValidationError::new("health_check.timeout_ms", "must be > 0"));
    }

    if config.steering.server_uri.trim().is_empty() {
        errors.push(ValidationError::new("steering.server_uri", "must not be empty"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.origin.base_url = "https://origin.example".into();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_missing_origin() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "origin.base_url");
    }

    #[test]
    fn test_rejects_non_http_origin() {
        assert!(parse_origin("ftp://origin.example").is_err());
        assert!(parse_origin("not a url").is_err());
        assert_eq!(
            parse_origin("http://127.0.0.1:9000").unwrap().as_str(),
            "http://127.0.0.1:9000/"
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.health_check.interval_secs = 0;
        config.health_check.timeout_ms = 0;
        config.listener.bind_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["listener.bind_address", "health_check.interval_secs", "health_check.timeout_ms"]
        );
    }

    #[test]
    fn test_bind_address_ignored_when_embedded() {
        let mut config = valid();
        config.runtime.listen_directly = false;
        config.listener.bind_address = String::new();
        assert!(validate_config(&config).is_ok());
    }
}
