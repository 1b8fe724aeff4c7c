//! Dispatcher metrics for observability
//!
//! Cumulative across dispatches of one `Dispatcher`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Dispatches run (empty ones included)
    batches: AtomicU64,
    /// Workers spawned
    workers_spawned: AtomicU64,
    /// Items completed in time
    completed: AtomicU64,
    /// Items that failed (cancellations excluded)
    failed: AtomicU64,
    /// Items cancelled at their suspension point
    cancelled: AtomicU64,
    /// Items still pending when the deadline elapsed
    timed_out: AtomicU64,
    /// Results that arrived after the pool was released
    late_discarded: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    pub fn inc_batches(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn workers_spawned(&self) -> u64 {
        self.workers_spawned.load(Ordering::Relaxed)
    }

    pub fn inc_workers_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn inc_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn inc_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn timed_out(&self) -> u64 {
        self.timed_out.load(Ordering::Relaxed)
    }

    pub fn add_timed_out(&self, count: u64) {
        self.timed_out.fetch_add(count, Ordering::Relaxed);
    }

    pub fn late_discarded(&self) -> u64 {
        self.late_discarded.load(Ordering::Relaxed)
    }

    pub fn inc_late_discarded(&self) {
        self.late_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches: self.batches(),
            workers_spawned: self.workers_spawned(),
            completed: self.completed(),
            failed: self.failed(),
            cancelled: self.cancelled(),
            timed_out: self.timed_out(),
            late_discarded: self.late_discarded(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches: u64,
    pub workers_spawned: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub timed_out: u64,
    pub late_discarded: u64,
}
