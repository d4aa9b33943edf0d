//! Active origin health checking.
//!
//! # Responsibilities
//! - Probe the origin with a HEAD request on a fixed interval
//! - Issue one probe at startup, before the first interval elapses
//! - Keep at most one probe in flight
//! - Publish a complete `HealthStatus` after each probe

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use chrono::Utc;
use reqwest::header::USER_AGENT;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};
use url::Url;

use crate::config::HealthCheckConfig;
use crate::health::state::{HealthState, HealthStatus};
use crate::observability::metrics;

/// What a single `probe()` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Another probe was in flight; the record is untouched.
    Skipped,
    /// The origin answered, with any status code.
    Reachable(StatusCode),
    /// Transport error or timeout.
    Unreachable(String),
}

pub struct HealthMonitor {
    state: Arc<HealthState>,
    target: Url,
    config: HealthCheckConfig,
    client: reqwest::Client,
    checks: AtomicU64,
}

impl HealthMonitor {
    pub fn new(
        state: Arc<HealthState>,
        target: Url,
        client: reqwest::Client,
        config: HealthCheckConfig,
    ) -> Self {
        Self {
            state,
            target,
            config,
            client,
            checks: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> &Arc<HealthState> {
        &self.state
    }

    /// Initial probe, then one probe per interval until shutdown.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            timeout_ms = self.config.timeout_ms,
            target = %self.target,
            "Health monitor starting"
        );

        self.spawn_probe();

        let interval = self.config.interval();
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Health check interval triggered");
                    self.spawn_probe();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn spawn_probe(self: &Arc<Self>) {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            monitor.probe().await;
        });
    }

    /// Probe the origin once, unless a probe is already in flight.
    pub async fn probe(&self) -> ProbeOutcome {
        let Some(guard) = self.state.try_begin_probe() else {
            tracing::info!("Health check already running, skipping");
            return ProbeOutcome::Skipped;
        };

        let check_id = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(check_id, target = %self.target, "Starting health check");

        let timeout = self.config.timeout();
        let started = Instant::now();
        let request = self
            .client
            .head(self.target.clone())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send();

        // Dropping the timed-out future aborts the connection.
        let result = time::timeout(timeout, request).await;
        let elapsed = started.elapsed();
        let response_time = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        let (status, outcome) = match result {
            Ok(Ok(response)) => {
                tracing::info!(
                    check_id,
                    status = %response.status(),
                    response_time_ms = response_time,
                    "Health check: HEALTHY"
                );
                (
                    HealthStatus::reachable(response_time, Utc::now()),
                    ProbeOutcome::Reachable(response.status()),
                )
            }
            Ok(Err(e)) => {
                let message = error_chain(&e);
                tracing::warn!(
                    check_id,
                    error = %message,
                    response_time_ms = response_time,
                    "Health check: UNHEALTHY"
                );
                (
                    HealthStatus::unreachable(message.clone(), response_time, Utc::now()),
                    ProbeOutcome::Unreachable(message),
                )
            }
            Err(_) => {
                let message = format!("Request timeout ({:?})", timeout);
                tracing::warn!(
                    check_id,
                    response_time_ms = response_time,
                    "Health check: UNHEALTHY, timed out"
                );
                (
                    HealthStatus::unreachable(message.clone(), response_time, Utc::now()),
                    ProbeOutcome::Unreachable(message),
                )
            }
        };

        metrics::record_origin_health(status.is_healthy, elapsed);
        guard.complete(status);
        outcome
    }
}

/// Render an error with its source chain, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
