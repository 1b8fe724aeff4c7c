//! # Integration Tests
//!
//! End-to-end tests across the workspace.
//!
//! Covers:
//! - Contract snapshot checks
//! - Document -> Dispatcher -> status sink scenarios
//! - Timing properties of the join (parallelism, deadline, cancellation)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{DispatchSettings, ItemOutcome, JoinStatus, StatusEvent};
    use dispatcher::{Dispatcher, MemorySink, SimulatedCall};
    use observability::BatchStatsAggregator;
    use work_source::SAMPLE_DOCUMENT;

    fn simulated_dispatcher(cost_ms: u64, deadline_ms: u64) -> (Dispatcher<SimulatedCall>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let settings = DispatchSettings {
            unit_cost_ms: cost_ms,
            deadline_ms,
        };
        (Dispatcher::simulated(settings, sink.clone()), sink)
    }

    /// Sample document, cost 100ms, deadline 2s: everything completes in ~100ms
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sample_document_completes_in_parallel() {
        let (dispatcher, sink) = simulated_dispatcher(100, 2_000);

        let report = dispatcher.process_document(SAMPLE_DOCUMENT).await.unwrap();

        assert_eq!(report.join_status, JoinStatus::AllSignaled);
        assert_eq!(report.completed_count(), 3);
        assert_eq!(report.workers_spawned, 3);
        assert!(report.elapsed >= Duration::from_millis(90));
        // Parallel, not 3 x 100ms
        assert!(report.elapsed < Duration::from_millis(250), "{:?}", report.elapsed);

        let lines = sink.lines();
        assert_eq!(lines.iter().filter(|l| l.starts_with("start: ")).count(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("done: ")).count(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("completed 3 calls in ")).count(), 1);
        assert!(lines.contains(&"done: Google".to_string()));
        assert!(lines.contains(&"done: Baidu".to_string()));
        assert!(lines.contains(&"done: SoSo".to_string()));
    }

    /// Same document with a 50ms deadline: everything times out
    #[tokio::test]
    async fn test_sample_document_short_deadline() {
        let (dispatcher, sink) = simulated_dispatcher(100, 50);

        let report = dispatcher.process_document(SAMPLE_DOCUMENT).await.unwrap();

        assert_eq!(report.join_status, JoinStatus::DeadlineElapsed);
        assert_eq!(report.timed_out_count(), 3);
        assert!(report.elapsed >= Duration::from_millis(50));
        assert!(report.elapsed < Duration::from_millis(100));
        assert_eq!(
            sink.count(|e| matches!(e, StatusEvent::Summary { completed: 0, total: 3, .. })),
            1
        );
    }

    #[tokio::test]
    async fn test_document_without_nodes() {
        let (dispatcher, sink) = simulated_dispatcher(100, 2_000);

        let start = Instant::now();
        let report = dispatcher
            .process_document(r#"{"name": "Json.CN", "page": 88}"#)
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(report.join_status, JoinStatus::Empty);
        assert_eq!(report.elapsed, Duration::ZERO);
        assert_eq!(sink.events(), vec![StatusEvent::NoWork]);
    }

    #[tokio::test]
    async fn test_malformed_document_starts_nothing() {
        let (dispatcher, sink) = simulated_dispatcher(100, 2_000);

        let err = dispatcher
            .process_document(r#"{"nodes": [{"name": 1}]}"#)
            .await
            .unwrap_err();

        assert!(err.is_decode());
        assert!(sink.events().is_empty());
        assert_eq!(dispatcher.metrics().batches, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_interrupts_sample_document() {
        let (dispatcher, sink) = simulated_dispatcher(60_000, 120_000);
        let token = dispatcher.shutdown_token().clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let start = Instant::now();
        let report = dispatcher.process_document(SAMPLE_DOCUMENT).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(report
            .items
            .iter()
            .all(|r| r.outcome.is_cancelled()));
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Interrupted { .. })), 3);
        assert_eq!(sink.count(|e| matches!(e, StatusEvent::Summary { .. })), 1);
    }

    /// Configuration file -> dispatcher -> aggregated runs
    #[tokio::test]
    async fn test_config_driven_repeated_runs() {
        let config = ConfigLoader::load_from_str(
            "[dispatch]\nunit_cost_ms = 20\ndeadline_ms = 1000\n[status]\nsink = \"log\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        let dispatcher = dispatcher::create_dispatcher(&config);

        let mut aggregator = BatchStatsAggregator::new();
        for _ in 0..3 {
            let report = dispatcher.process_document(SAMPLE_DOCUMENT).await.unwrap();
            assert!(report.items.iter().all(|r| r.outcome == ItemOutcome::Completed));
            aggregator.update(&report);
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_batches, 3);
        assert_eq!(summary.total_calls, 9);
        assert_eq!(summary.completed_calls, 9);
        assert_eq!(dispatcher.metrics().workers_spawned, 9);
    }
}
