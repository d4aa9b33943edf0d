//! Origin health record and probe gate.
//!
//! # States
//! - Idle: no probe in flight
//! - Probing: one probe holds the gate
//!
//! # State Transitions
//! ```text
//! Idle → Probing: try_begin_probe() wins the flag
//! Probing → Idle: ProbeGuard dropped (after complete() or on any early exit)
//! ```
//!
//! # Design Decisions
//! - The record is swapped whole, readers never see a mix of two probes
//! - Only the holder of the gate can write the record

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of the most recent origin probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Duration of the most recent probe in milliseconds.
    pub response_time: Option<u64>,
}

impl HealthStatus {
    /// Nothing probed yet.
    pub fn unknown() -> Self {
        Self {
            is_healthy: false,
            last_check: None,
            last_error: None,
            response_time: None,
        }
    }

    /// Assumed healthy for hosts that cannot run background probes.
    pub fn seeded_healthy(now: DateTime<Utc>) -> Self {
        Self {
            is_healthy: true,
            last_check: Some(now),
            last_error: None,
            response_time: None,
        }
    }

    /// Initial record for the given polling capability.
    pub fn initial(background_polling: bool) -> Self {
        if background_polling {
            Self::unknown()
        } else {
            Self::seeded_healthy(Utc::now())
        }
    }

    pub fn reachable(response_time_ms: u64, now: DateTime<Utc>) -> Self {
        Self {
            is_healthy: true,
            last_check: Some(now),
            last_error: None,
            response_time: Some(response_time_ms),
        }
    }

    pub fn unreachable(error: impl Into<String>, response_time_ms: u64, now: DateTime<Utc>) -> Self {
        Self {
            is_healthy: false,
            last_check: Some(now),
            last_error: Some(error.into()),
            response_time: Some(response_time_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePhase {
    Idle,
    Probing,
}

/// Shared origin health: one swappable record plus a probe flag.
#[derive(Debug)]
pub struct HealthState {
    status: ArcSwap<HealthStatus>,
    probing: AtomicBool,
}

impl HealthState {
    pub fn new(initial: HealthStatus) -> Self {
        Self {
            status: ArcSwap::from_pointee(initial),
            probing: AtomicBool::new(false),
        }
    }

    /// Current record.
    pub fn snapshot(&self) -> Arc<HealthStatus> {
        self.status.load_full()
    }

    pub fn phase(&self) -> ProbePhase {
        if self.probing.load(Ordering::Acquire) {
            ProbePhase::Probing
        } else {
            ProbePhase::Idle
        }
    }

    /// Enter `Probing`. Returns `None` if another probe holds the gate.
    pub fn try_begin_probe(&self) -> Option<ProbeGuard<'_>> {
        self.probing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProbeGuard { state: self })
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(HealthStatus::unknown())
    }
}

/// Exclusive right to write the next record. Dropping it returns to `Idle`.
#[derive(Debug)]
pub struct ProbeGuard<'a> {
    state: &'a HealthState,
}

impl ProbeGuard<'_> {
    /// Publish the probe's record and release the gate.
    pub fn complete(self, status: HealthStatus) {
        self.state.status.store(Arc::new(status));
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.state.probing.store(false, Ordering::Release);
    }
}
