//! Content-steering subsystem.
//!
//! # Data Flow
//! ```text
//! Token issuance (/jwt/encode, /jwt/generate):
//!     caller overrides (query or JSON body)
//!     → payload.rs (default payload + shallow merge + iat)
//!     → token.rs (header.payload.signature)
//!     → payload segment or full token back to the caller
//!
//! DASH parameters (every request):
//!     _DASH_pathway / _DASH_throughput query params
//!     → dash.rs (parse into request extensions)
//!     → /dash-params echo, /dash-jwt one-off token
//! ```
//!
//! # Design Decisions
//! - Nothing here is persisted; every token is built per request
//! - Tokens are debug tooling, not authentication: decode never verifies

pub mod dash;
pub mod payload;
pub mod token;

pub use dash::{DashParams, DashParamsError};
pub use payload::{Claims, Pathway, SteeringPayload};
pub use token::TokenError;
