//! Advisory solve statistics shared across requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Thread-safe cumulative counters over solve requests.
///
/// These are observability data, not correctness-critical state; the
/// individual updates may interleave between concurrent requests.
#[derive(Debug, Default)]
pub struct SolveStats {
    total_requests: AtomicU64,
    successful_solves: AtomicU64,
    failed_solves: AtomicU64,
    total_solving_millis: AtomicU64,
}

impl SolveStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        SolveStats::default()
    }

    /// Count an incoming request.
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a successful solve and its wall-clock time.
    pub fn record_success(&self, elapsed: Duration) {
        self.successful_solves.fetch_add(1, Ordering::Relaxed);
        self.total_solving_millis
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    /// Count a failed solve.
    pub fn record_failure(&self) {
        self.failed_solves.fetch_add(1, Ordering::Relaxed);
    }

    /// A point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let successes = self.successful_solves.load(Ordering::Relaxed);
        let total_seconds =
            self.total_solving_millis.load(Ordering::Relaxed) as f64 / 1000.0;

        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_solves: successes,
            failed_solves: self.failed_solves.load(Ordering::Relaxed),
            total_solving_time: total_seconds,
            average_solving_time: if successes > 0 {
                total_seconds / successes as f64
            } else {
                0.0
            },
        }
    }
}

/// Serializable view of [`SolveStats`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_solves: u64,
    pub failed_solves: u64,
    /// Cumulative solving time across successful requests, in seconds.
    pub total_solving_time: f64,
    /// Mean solving time per successful request, in seconds.
    pub average_solving_time: f64,
}
