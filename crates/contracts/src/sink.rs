//! StatusSink trait - progress/status output interface
//!
//! Sinks receive one event per state change and render it as a single
//! UTF-8 line. Exact wording is not load-bearing; the event set and the
//! start-before-finish order per item are.

use std::fmt;
use std::time::Duration;

/// A single status event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Batch was empty
    NoWork,
    /// A unit of work started on a worker
    Started { label: String, worker_id: String },
    /// A unit of work completed
    Done { label: String },
    /// A unit of work was cancelled at its suspension point
    Interrupted { label: String },
    /// A unit of work failed
    Failed { label: String, reason: String },
    /// Final line, emitted exactly once per dispatch
    Summary {
        completed: usize,
        total: usize,
        elapsed: Duration,
    },
}

impl StatusEvent {
    /// Label of the item this event refers to, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Started { label, .. }
            | Self::Done { label }
            | Self::Interrupted { label }
            | Self::Failed { label, .. } => Some(label),
            Self::NoWork | Self::Summary { .. } => None,
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWork => write!(f, "no work"),
            Self::Started { label, worker_id } => write!(f, "start: {label} ({worker_id})"),
            Self::Done { label } => write!(f, "done: {label}"),
            Self::Interrupted { label } => write!(f, "interrupted: {label}"),
            Self::Failed { label, reason } => write!(f, "failed: {label}: {reason}"),
            Self::Summary {
                completed,
                elapsed,
                ..
            } => write!(
                f,
                "completed {completed} calls in {:.3}s",
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Status output trait
///
/// Called concurrently from every worker, hence `Send + Sync`.
pub trait StatusSink: Send + Sync {
    /// Sink name (used for logging)
    fn name(&self) -> &str;

    /// Receive one event
    fn emit(&self, event: &StatusEvent);
}
