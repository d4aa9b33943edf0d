//! Origin health subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     one probe immediately (background polling hosts only)
//!
//! Periodic timer (active.rs):
//!     tick
//!     → state.rs gate: Idle → Probing, or skip if already Probing
//!     → HEAD origin with hard timeout
//!     → full HealthStatus swapped in, gate back to Idle
//!
//! GET /health:
//!     → state.rs snapshot
//! ```
//!
//! # Design Decisions
//! - Any HTTP response counts as reachable, including 4xx/5xx
//! - Constrained hosts never schedule probes and start seeded healthy
//! - The state is injected into handlers, never a global

pub mod active;
pub mod state;

pub use active::{HealthMonitor, ProbeOutcome};
pub use state::{HealthState, HealthStatus, ProbePhase};
