//! Dispatch outcomes - Dispatcher output
//!
//! Per-item outcome tags plus the batch-level report.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::WorkItem;

/// Why a unit of work did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "message")]
pub enum FailureReason {
    /// Interrupted by shutdown at its suspension point
    Cancelled,
    /// The call itself returned an error
    Call(String),
    /// The unit of work panicked
    Panicked,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::Call(message) => write!(f, "{message}"),
            Self::Panicked => write!(f, "panicked"),
        }
    }
}

/// Outcome of a single work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    /// The call finished and signaled before the join wait returned
    Completed,
    /// The call failed or was cancelled
    Failed(FailureReason),
    /// The join deadline elapsed before the item signaled
    TimedOut,
}

impl ItemOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Failed(FailureReason::Cancelled))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed(reason) => write!(f, "failed({reason})"),
            Self::TimedOut => write!(f, "timed-out"),
        }
    }
}

/// How the join wait resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStatus {
    /// Batch was empty, nothing was started
    Empty,
    /// Every worker signaled before the deadline
    AllSignaled,
    /// The deadline elapsed first
    DeadlineElapsed,
}

/// Outcome of one item together with the worker that ran it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub item: WorkItem,
    pub worker_id: String,
    pub outcome: ItemOutcome,
}

/// Result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Per-item outcomes, in submission order
    pub items: Vec<ItemReport>,

    /// From "all units submitted" to "join wait returned"
    pub elapsed: Duration,

    pub join_status: JoinStatus,

    /// Number of workers the pool spawned
    pub workers_spawned: usize,
}

impl DispatchReport {
    /// Report for an empty batch
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            elapsed: Duration::ZERO,
            join_status: JoinStatus::Empty,
            workers_spawned: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn completed_count(&self) -> usize {
        self.count(ItemOutcome::is_completed)
    }

    pub fn cancelled_count(&self) -> usize {
        self.count(ItemOutcome::is_cancelled)
    }

    pub fn timed_out_count(&self) -> usize {
        self.count(ItemOutcome::is_timed_out)
    }

    /// Failed items, cancellations included
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.join_status == JoinStatus::Empty
    }

    pub fn timed_out(&self) -> bool {
        self.join_status == JoinStatus::DeadlineElapsed
    }

    /// Labels of items that had not signaled when the join wait returned
    pub fn pending_labels(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|r| r.outcome.is_timed_out())
            .map(|r| r.item.label())
            .collect()
    }

    /// Outcome for the item with the given label (first match)
    pub fn outcome_of(&self, label: &str) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|r| r.item.label() == label)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|r| pred(&r.outcome)).count()
    }
}
