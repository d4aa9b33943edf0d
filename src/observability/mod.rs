//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Per request (http layer):
//!     → x-request-id assigned and propagated
//!     → TraceLayer span around the handler
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings, for anything machine-read
//! - Request ID flows through all request logs
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
