//! # Dispatcher
//!
//! Fan-out dispatch-and-join module.
//!
//! Responsibilities:
//! - Size a worker pool to the batch, one worker per `WorkItem`
//! - Run every unit of work concurrently
//! - Join on a completion latch bounded by a deadline
//! - Release the pool on every exit path; abandon, never kill, late workers

pub mod dispatcher;
pub mod error;
pub mod latch;
pub mod metrics;
pub mod pool;
pub mod simulated;
pub mod sinks;
pub mod slots;

pub use contracts::{Batch, DispatchReport, ItemOutcome, RemoteCall, StatusEvent, StatusSink, WorkItem};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder};
pub use error::DispatcherError;
pub use latch::CompletionLatch;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use pool::{PoolState, WorkerPool};
pub use simulated::SimulatedCall;
pub use sinks::{create_sink, LogSink, MemorySink, StdoutSink};
pub use slots::OutcomeSlots;
pub use tokio_util::sync::CancellationToken;
