//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → axum router: /health, /jwt/*, /dash-* short-circuit
//!     → router.rs (classify the rest)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: Manifest or Passthrough
//! ```
//!
//! # Design Decisions
//! - Classification is fixed at startup, immutable at runtime
//! - No regex in hot path (suffix matching only)
//! - Deterministic: same input always gets the same kind

pub mod matcher;
pub mod router;

pub use router::{RouteKind, Router};
