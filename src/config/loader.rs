//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Path of an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "STEERING_PROXY_CONFIG";
/// Origin base URL.
pub const TARGET_ENV: &str = "PROXY_TARGET";
pub const BIND_ENV: &str = "STEERING_PROXY_BIND";
/// Truthy value marks a short-lived invocation host.
pub const CONSTRAINED_ENV: &str = "STEERING_PROXY_CONSTRAINED";
pub const LISTEN_DIRECTLY_ENV: &str = "STEERING_PROXY_LISTEN_DIRECTLY";
/// Set by AWS Lambda in every function environment.
pub const LAMBDA_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration the way the binary does: optional file, then
/// environment overrides, then validation. The origin is read once here.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => read_config(Path::new(&path))?,
        Err(_) => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment overrides using `lookup` as the variable source.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(target) = lookup(TARGET_ENV).filter(|v| !v.trim().is_empty()) {
        config.origin.base_url = target;
    }
    if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
        config.listener.bind_address = bind;
    }

    let constrained = lookup(CONSTRAINED_ENV).is_some_and(|v| is_truthy(&v))
        || lookup(LAMBDA_ENV).is_some();
    if constrained {
        config.runtime.background_polling = false;
    }

    if let Some(value) = lookup(LISTEN_DIRECTLY_ENV) {
        config.runtime.listen_directly = is_truthy(&value);
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
