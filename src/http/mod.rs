//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, DASH parameter capture)
//!     → handlers.rs (/health, /jwt/*, /dash-*)   or
//!       proxy.rs (classify → manifest rewrite | passthrough via origin.rs)
//!     → response.rs (strip hop-by-hop, fix content-length)
//!     → Send to client
//! ```

pub mod handlers;
pub mod invocation;
pub mod origin;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use origin::OriginClient;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
