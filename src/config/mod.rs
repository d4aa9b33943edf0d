//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML, STEERING_PROXY_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PROXY_TARGET, constrained-host flags)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared with the HTTP server and health monitor
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    HealthCheckConfig, ListenerConfig, ObservabilityConfig, OriginConfig, ProxyConfig,
    RuntimeConfig, SteeringConfig,
};
