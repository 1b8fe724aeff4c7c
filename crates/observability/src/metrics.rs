//! Dispatch metrics
//!
//! Prometheus recording per batch, plus an in-memory aggregator for
//! summarizing repeated runs.

use std::collections::BTreeMap;

use contracts::{DispatchReport, FailureReason, ItemOutcome};
use metrics::{counter, gauge, histogram};

/// Record metrics from a finished dispatch
///
/// Call once per `DispatchReport`.
pub fn record_dispatch_report(report: &DispatchReport) {
    counter!("fanout_batches_total").increment(1);

    if report.is_empty() {
        counter!("fanout_batches_empty_total").increment(1);
        return;
    }

    gauge!("fanout_batch_size").set(report.total() as f64);
    counter!("fanout_workers_spawned_total").increment(report.workers_spawned as u64);
    histogram!("fanout_batch_elapsed_ms").record(report.elapsed.as_secs_f64() * 1000.0);

    if report.timed_out() {
        counter!("fanout_join_timeouts_total").increment(1);
    }

    for item in &report.items {
        counter!("fanout_calls_total", "outcome" => outcome_label(&item.outcome)).increment(1);
    }
}

/// Record a document that failed to decode
pub fn record_document_rejected() {
    counter!("fanout_documents_rejected_total").increment(1);
}

fn outcome_label(outcome: &ItemOutcome) -> &'static str {
    match outcome {
        ItemOutcome::Completed => "completed",
        ItemOutcome::TimedOut => "timed_out",
        ItemOutcome::Failed(FailureReason::Cancelled) => "cancelled",
        ItemOutcome::Failed(FailureReason::Panicked) => "panicked",
        ItemOutcome::Failed(FailureReason::Call(_)) => "failed",
    }
}

/// Aggregates reports of repeated dispatches
#[derive(Debug, Clone, Default)]
pub struct BatchStatsAggregator {
    pub total_batches: u64,
    pub total_calls: u64,
    pub timed_out_batches: u64,
    /// Calls per outcome label
    pub outcome_counts: BTreeMap<&'static str, u64>,
    /// Batch elapsed time (ms)
    pub elapsed_stats: RunningStats,
}

impl BatchStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, report: &DispatchReport) {
        self.total_batches += 1;
        self.total_calls += report.total() as u64;

        if report.timed_out() {
            self.timed_out_batches += 1;
        }

        for item in &report.items {
            *self
                .outcome_counts
                .entry(outcome_label(&item.outcome))
                .or_insert(0) += 1;
        }

        if !report.is_empty() {
            self.elapsed_stats
                .push(report.elapsed.as_secs_f64() * 1000.0);
        }
    }

    pub fn summary(&self) -> BatchSummary {
        let completed = self.outcome_counts.get("completed").copied().unwrap_or(0);
        BatchSummary {
            total_batches: self.total_batches,
            total_calls: self.total_calls,
            completed_calls: completed,
            timed_out_batches: self.timed_out_batches,
            completion_rate: if self.total_calls > 0 {
                completed as f64 / self.total_calls as f64 * 100.0
            } else {
                0.0
            },
            elapsed_ms: StatsSummary::from(&self.elapsed_stats),
            outcome_counts: self.outcome_counts.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Aggregated summary
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total_batches: u64,
    pub total_calls: u64,
    pub completed_calls: u64,
    pub timed_out_batches: u64,
    pub completion_rate: f64,
    pub elapsed_ms: StatsSummary,
    pub outcome_counts: BTreeMap<&'static str, u64>,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Batches: {}", self.total_batches)?;
        writeln!(
            f,
            "Calls: {} ({} completed, {:.2}%)",
            self.total_calls, self.completed_calls, self.completion_rate
        )?;
        writeln!(f, "Batches hitting the deadline: {}", self.timed_out_batches)?;
        writeln!(f, "Elapsed (ms): {}", self.elapsed_ms)?;

        if !self.outcome_counts.is_empty() {
            writeln!(f, "Outcomes:")?;
            for (outcome, count) in &self.outcome_counts {
                writeln!(f, "  {}: {}", outcome, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
