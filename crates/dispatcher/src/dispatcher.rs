//! Dispatcher - fan out one worker per item and join under a deadline

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{
    Batch, DispatchReport, DispatchSettings, FailureReason, FanoutConfig, ItemOutcome,
    ItemReport, JoinStatus, RemoteCall, StatusEvent, StatusSink, WorkItem,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, info, instrument, warn, Instrument};
use work_source::DocumentSource;

use crate::error::DispatcherError;
use crate::latch::CompletionLatch;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::pool::{PoolState, WorkerPool};
use crate::simulated::SimulatedCall;
use crate::sinks::{create_sink, LogSink};
use crate::slots::OutcomeSlots;

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder<C> {
    call: C,
    deadline: Duration,
    sink: Option<Arc<dyn StatusSink>>,
    shutdown: Option<CancellationToken>,
}

impl<C: RemoteCall + Sync + 'static> DispatcherBuilder<C> {
    pub fn new(call: C) -> Self {
        Self {
            call,
            deadline: DispatchSettings::default().deadline(),
            sink: None,
            shutdown: None,
        }
    }

    /// Overall join deadline
    ///
    /// Should exceed the cost of a unit of work, otherwise every dispatch
    /// resolves through the timeout path.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Token whose cancellation interrupts in-flight workers
    pub fn shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn build(self) -> Dispatcher<C> {
        Dispatcher {
            call: Arc::new(self.call),
            deadline: self.deadline,
            sink: self
                .sink
                .unwrap_or_else(|| Arc::new(LogSink::new("dispatcher"))),
            shutdown: self.shutdown.unwrap_or_default(),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }
}

/// Fan-out dispatcher
///
/// Holds no per-batch state: every `dispatch` builds its own pool, latch and
/// outcome slots and drops them when it returns.
pub struct Dispatcher<C> {
    call: Arc<C>,
    deadline: Duration,
    sink: Arc<dyn StatusSink>,
    shutdown: CancellationToken,
    metrics: Arc<DispatchMetrics>,
}

impl<C: RemoteCall + Sync + 'static> Dispatcher<C> {
    pub fn builder(call: C) -> DispatcherBuilder<C> {
        DispatcherBuilder::new(call)
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Interrupt every in-flight worker
    ///
    /// Permanent: later dispatches see their workers cancelled immediately.
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// Decode `document` and dispatch its nodes
    ///
    /// # Errors
    /// Decode errors are returned before any worker starts.
    #[instrument(name = "dispatcher_process_document", skip(self, document))]
    pub async fn process_document(&self, document: &str) -> Result<DispatchReport, DispatcherError> {
        let batch = DocumentSource::decode(document)?;
        self.dispatch(batch).await
    }

    /// Run every item of `batch` on its own worker and join
    ///
    /// Returns once all workers signaled or the deadline elapsed. Per-item
    /// failures, cancellations and timeouts are recorded in the report.
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, batch),
        fields(items = batch.len(), deadline_ms = self.deadline.as_millis() as u64)
    )]
    pub async fn dispatch(&self, batch: Batch) -> Result<DispatchReport, DispatcherError> {
        self.metrics.inc_batches();

        if batch.is_empty() {
            info!("No work to dispatch");
            self.sink.emit(&StatusEvent::NoWork);
            return Ok(DispatchReport::empty());
        }

        let total = batch.len();
        let mut pool = WorkerPool::with_capacity(total);
        let run = Arc::new(RunState {
            call: Arc::clone(&self.call),
            sink: Arc::clone(&self.sink),
            slots: OutcomeSlots::new(total),
            latch: CompletionLatch::new(total),
            cancel: self.shutdown.child_token(),
            pool: pool.state(),
            metrics: Arc::clone(&self.metrics),
        });

        let mut assignments = Vec::with_capacity(total);
        for (index, item) in batch.into_iter().enumerate() {
            let worker_run = Arc::clone(&run);
            let worker_item = item.clone();
            let worker_id = pool.submit(move |worker_id| {
                let span = debug_span!("fanout_worker", worker = %worker_id);
                run_worker(worker_run, index, worker_item, worker_id).instrument(span)
            })?;
            self.metrics.inc_workers_spawned();
            assignments.push((item, worker_id));
        }

        let submitted_at = Instant::now();
        debug!(workers = pool.spawned(), "All units submitted");

        let all_signaled = run.latch.wait_timeout(self.deadline).await;
        let elapsed = submitted_at.elapsed();

        let workers_spawned = pool.spawned();
        let still_running = pool.release();
        let outcomes = run.slots.snapshot();

        let report = DispatchReport {
            items: assignments
                .into_iter()
                .zip(outcomes)
                .map(|((item, worker_id), outcome)| ItemReport {
                    item,
                    worker_id,
                    outcome,
                })
                .collect(),
            elapsed,
            join_status: if all_signaled {
                JoinStatus::AllSignaled
            } else {
                JoinStatus::DeadlineElapsed
            },
            workers_spawned,
        };

        if report.timed_out() {
            self.metrics.add_timed_out(report.timed_out_count() as u64);
            warn!(
                pending = ?report.pending_labels(),
                still_running,
                "Join deadline elapsed, abandoning outstanding workers"
            );
        }

        info!(
            completed = report.completed_count(),
            failed = report.failed_count(),
            timed_out = report.timed_out_count(),
            total,
            elapsed_secs = elapsed.as_secs_f64(),
            "Dispatch finished"
        );

        self.sink.emit(&StatusEvent::Summary {
            completed: report.completed_count(),
            total,
            elapsed,
        });

        Ok(report)
    }
}

impl Dispatcher<SimulatedCall> {
    /// Dispatcher running simulated calls of `settings.unit_cost()`
    pub fn simulated(settings: DispatchSettings, sink: Arc<dyn StatusSink>) -> Self {
        if !settings.deadline_covers_unit_cost() {
            warn!(
                unit_cost_ms = settings.unit_cost_ms,
                deadline_ms = settings.deadline_ms,
                "Deadline does not exceed unit cost; every dispatch will time out"
            );
        }

        DispatcherBuilder::new(SimulatedCall::new(settings.unit_cost()))
            .deadline(settings.deadline())
            .sink(sink)
            .build()
    }
}

/// Convenience function to create a simulated dispatcher from configuration
#[instrument(name = "dispatcher_create", skip(config))]
pub fn create_dispatcher(config: &FanoutConfig) -> Dispatcher<SimulatedCall> {
    Dispatcher::simulated(config.dispatch, create_sink(config.status.sink))
}

/// State shared by the workers of one dispatch
struct RunState<C> {
    call: Arc<C>,
    sink: Arc<dyn StatusSink>,
    slots: OutcomeSlots,
    latch: CompletionLatch,
    cancel: CancellationToken,
    pool: PoolState,
    metrics: Arc<DispatchMetrics>,
}

impl<C> RunState<C> {
    fn emit(&self, event: StatusEvent) {
        if !self.pool.is_released() {
            self.sink.emit(&event);
        }
    }

    /// Record the outcome of item `index`
    ///
    /// Results arriving after the pool was released are dropped.
    fn finish(&self, index: usize, item: &WorkItem, outcome: ItemOutcome) {
        if self.pool.is_released() {
            self.metrics.inc_late_discarded();
            debug!(label = %item.label(), %outcome, "Late result discarded");
            return;
        }

        let label = item.label().to_string();
        let event = match &outcome {
            ItemOutcome::Completed => {
                self.metrics.inc_completed();
                StatusEvent::Done { label }
            }
            ItemOutcome::Failed(FailureReason::Cancelled) => {
                self.metrics.inc_cancelled();
                StatusEvent::Interrupted { label }
            }
            ItemOutcome::Failed(reason) => {
                self.metrics.inc_failed();
                StatusEvent::Failed {
                    label,
                    reason: reason.to_string(),
                }
            }
            ItemOutcome::TimedOut => return,
        };

        self.slots.fill(index, outcome);
        self.sink.emit(&event);
    }
}

/// Counts the latch down when the worker ends, however it ends
struct SignalGuard<C> {
    run: Arc<RunState<C>>,
    index: usize,
    item: WorkItem,
    finished: bool,
}

impl<C> Drop for SignalGuard<C> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(label = %self.item.label(), "Unit of work aborted before finishing");
            self.run.finish(
                self.index,
                &self.item,
                ItemOutcome::Failed(FailureReason::Panicked),
            );
        }
        self.run.latch.count_down();
    }
}

async fn run_worker<C: RemoteCall + Sync + 'static>(
    run: Arc<RunState<C>>,
    index: usize,
    item: WorkItem,
    worker_id: String,
) {
    let mut guard = SignalGuard {
        run: Arc::clone(&run),
        index,
        item: item.clone(),
        finished: false,
    };

    debug!(label = %item.label(), url = %item.target(), "Unit of work started");
    run.emit(StatusEvent::Started {
        label: item.label().to_string(),
        worker_id,
    });

    let outcome = tokio::select! {
        biased;
        _ = run.cancel.cancelled() => ItemOutcome::Failed(FailureReason::Cancelled),
        result = run.call.call(&item) => match result {
            Ok(()) => ItemOutcome::Completed,
            Err(e) => ItemOutcome::Failed(FailureReason::Call(e.to_string())),
        },
    };

    run.finish(index, &item, outcome);
    guard.finished = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use contracts::CallError;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn batch(labels: &[&str]) -> Batch {
        labels
            .iter()
            .map(|l| WorkItem::new(*l, format!("http://www.{l}.com")))
            .collect()
    }

    fn simulated(cost_ms: u64, deadline_ms: u64) -> (Dispatcher<SimulatedCall>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = Dispatcher::simulated(
            DispatchSettings {
                unit_cost_ms: cost_ms,
                deadline_ms,
            },
            sink.clone(),
        );
        (dispatcher, sink)
    }

    /// Records every target it is called with
    struct RecordingCall {
        seen: Mutex<Vec<String>>,
    }

    impl RemoteCall for RecordingCall {
        fn name(&self) -> &str {
            "recording"
        }

        async fn call(&self, item: &WorkItem) -> Result<(), CallError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.seen.lock().unwrap().push(item.target().to_string());
            Ok(())
        }
    }

    /// Fails for targets containing "bad", panics for "panic"
    struct FlakyCall;

    impl RemoteCall for FlakyCall {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn call(&self, item: &WorkItem) -> Result<(), CallError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if item.target().contains("panic") {
                panic!("unit of work blew up");
            }
            if item.target().contains("bad") {
                return Err(CallError::new(item.target(), "connection refused"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let (dispatcher, sink) = simulated(1_000, 2_000);

        let start = Instant::now();
        let report = dispatcher.dispatch(Batch::new()).await.unwrap();

        assert!(start.elapsed() < Duration::from_millis(100));
        assert!(report.is_empty());
        assert_eq!(report.elapsed, Duration::ZERO);
        assert_eq!(report.workers_spawned, 0);
        assert_eq!(sink.lines(), vec!["no work"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_all_complete_in_parallel() {
        let (dispatcher, sink) = simulated(100, 2_000);

        let report = dispatcher
            .dispatch(batch(&["Google", "Baidu", "SoSo"]))
            .await
            .unwrap();

        assert_eq!(report.join_status, JoinStatus::AllSignaled);
        assert_eq!(report.completed_count(), 3);
        assert_eq!(report.workers_spawned, 3);
        assert!(report.elapsed >= Duration::from_millis(90));
        assert!(report.elapsed < Duration::from_millis(250), "{:?}", report.elapsed);

        let events = sink.events();
        assert_eq!(events.iter().filter(|e| matches!(e, StatusEvent::Started { .. })).count(), 3);
        assert_eq!(events.iter().filter(|e| matches!(e, StatusEvent::Done { .. })).count(), 3);
        assert_eq!(events.iter().filter(|e| matches!(e, StatusEvent::Summary { .. })).count(), 1);
        assert!(matches!(events.last(), Some(StatusEvent::Summary { completed: 3, total: 3, .. })));
    }

    #[tokio::test]
    async fn test_start_precedes_done_per_item() {
        let (dispatcher, sink) = simulated(20, 2_000);
        dispatcher.dispatch(batch(&["a", "b", "c"])).await.unwrap();

        let events = sink.events();
        for label in ["a", "b", "c"] {
            let start = events
                .iter()
                .position(|e| matches!(e, StatusEvent::Started { label: l, .. } if l == label))
                .unwrap();
            let done = events
                .iter()
                .position(|e| matches!(e, StatusEvent::Done { label: l } if l == label))
                .unwrap();
            assert!(start < done);
        }
    }

    #[tokio::test]
    async fn test_deadline_before_cost_times_out() {
        let (dispatcher, sink) = simulated(500, 50);

        let report = dispatcher.dispatch(batch(&["Google", "Baidu", "SoSo"])).await.unwrap();

        assert!(report.timed_out());
        assert_eq!(report.timed_out_count(), 3);
        assert!(report.elapsed >= Duration::from_millis(50));
        assert!(report.elapsed < Duration::from_millis(400));
        assert_eq!(report.pending_labels(), vec!["Google", "Baidu", "SoSo"]);
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Summary { .. })), 1);
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Done { .. })), 0);
        assert_eq!(dispatcher.metrics().timed_out, 3);
    }

    #[tokio::test]
    async fn test_late_results_discarded_not_killed() {
        let (dispatcher, sink) = simulated(80, 20);

        let report = dispatcher.dispatch(batch(&["a", "b"])).await.unwrap();
        assert_eq!(report.timed_out_count(), 2);

        // Abandoned workers keep running and finish on their own.
        tokio::time::sleep(Duration::from_millis(200)).await;

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.late_discarded, 2);
        assert_eq!(metrics.completed, 0);
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Done { .. })), 0);
        assert!(matches!(sink.events().last(), Some(StatusEvent::Summary { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancellation_interrupts_workers() {
        let (dispatcher, sink) = simulated(5_000, 10_000);
        let token = dispatcher.shutdown_token().clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let start = Instant::now();
        let report = dispatcher.dispatch(batch(&["a", "b", "c"])).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(report.join_status, JoinStatus::AllSignaled);
        assert_eq!(report.cancelled_count(), 3);
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Interrupted { .. })), 3);
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Summary { completed: 0, .. })), 1);
        assert_eq!(dispatcher.metrics().cancelled, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_item_processed_exactly_once() {
        let call = RecordingCall {
            seen: Mutex::new(Vec::new()),
        };
        let dispatcher = Dispatcher::builder(call)
            .deadline(Duration::from_secs(2))
            .sink(Arc::new(MemorySink::new()))
            .build();

        let labels: Vec<String> = (0..20).map(|i| format!("node{i}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let report = dispatcher.dispatch(batch(&refs)).await.unwrap();

        assert_eq!(report.workers_spawned, 20);
        assert_eq!(report.completed_count(), 20);

        let seen = dispatcher.call.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 20);
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 20);

        let workers: HashSet<_> = report.items.iter().map(|r| r.worker_id.as_str()).collect();
        assert_eq!(workers.len(), 20);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = Dispatcher::builder(FlakyCall)
            .deadline(Duration::from_secs(2))
            .sink(sink.clone())
            .build();

        let items: Batch = vec![
            WorkItem::new("good", "http://good"),
            WorkItem::new("bad", "http://bad"),
            WorkItem::new("boom", "http://panic"),
        ]
        .into();

        let start = Instant::now();
        let report = dispatcher.dispatch(items).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(report.join_status, JoinStatus::AllSignaled);
        assert_eq!(report.outcome_of("good"), Some(&ItemOutcome::Completed));
        assert!(matches!(
            report.outcome_of("bad"),
            Some(ItemOutcome::Failed(FailureReason::Call(msg))) if msg.contains("connection refused")
        ));
        assert_eq!(
            report.outcome_of("boom"),
            Some(&ItemOutcome::Failed(FailureReason::Panicked))
        );
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Failed { .. })), 2);
    }

    #[tokio::test]
    async fn test_process_document_decode_error() {
        let (dispatcher, sink) = simulated(10, 100);

        let err = dispatcher.process_document("{ nodes: ").await.unwrap_err();

        assert!(err.is_decode());
        assert!(sink.events().is_empty());
        assert_eq!(dispatcher.metrics().workers_spawned, 0);
    }

    #[tokio::test]
    async fn test_dispatcher_is_stateless_between_runs() {
        let (dispatcher, sink) = simulated(10, 1_000);

        let first = dispatcher.dispatch(batch(&["a"])).await.unwrap();
        let second = dispatcher.dispatch(batch(&["b", "c"])).await.unwrap();

        assert_eq!(first.workers_spawned, 1);
        assert_eq!(second.workers_spawned, 2);
        assert_eq!(second.items[0].worker_id, "worker-1");
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Summary { .. })), 2);
        assert_eq!(dispatcher.metrics().batches, 2);
    }
}
