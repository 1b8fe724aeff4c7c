//! `run` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, FanoutConfig};
use observability::{record_dispatch_report, record_document_rejected, BatchStatsAggregator};
use tracing::{info, warn};
use work_source::DocumentSource;

use super::read_document;
use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_batch(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;

    for warning in ConfigLoader::warnings(&config) {
        warn!(%warning, "Configuration warning");
    }

    let document = read_document(args.document.as_deref())?;

    info!(
        document = %args.document.as_deref().map_or("<sample>".into(), |p| p.display().to_string()),
        unit_cost_ms = config.dispatch.unit_cost_ms,
        deadline_ms = config.dispatch.deadline_ms,
        sink = ?config.status.sink,
        repeat = args.repeat,
        "Configuration loaded"
    );

    if args.dry_run {
        let batch = DocumentSource::decode(&document).context("Failed to decode document")?;
        info!("Dry run mode - inputs are valid, exiting");
        println!(
            "{} call(s) would be dispatched: {}",
            batch.len(),
            batch.labels().join(", ")
        );
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let dispatcher = dispatcher::create_dispatcher(&config);

    let token = dispatcher.shutdown_token().clone();
    let signal_task = tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, interrupting in-flight calls...");
        token.cancel();
    });

    let mut aggregator = BatchStatsAggregator::new();

    for run in 1..=args.repeat {
        if dispatcher.shutdown_token().is_cancelled() {
            warn!(run, "Shutdown requested, skipping remaining runs");
            break;
        }

        let report = match dispatcher.process_document(&document).await {
            Ok(report) => report,
            Err(e) => {
                if e.is_decode() {
                    record_document_rejected();
                }
                signal_task.abort();
                return Err(e).context("Failed to process document");
            }
        };

        record_dispatch_report(&report);
        aggregator.update(&report);

        if args.json {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{json}");
        }
    }

    signal_task.abort();

    if args.repeat > 1 {
        println!("\n{}", aggregator.summary());
    }

    info!("Fanout finished");
    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &RunArgs) -> Result<FanoutConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => load_config_file(path)?,
        None => {
            info!("No configuration file given, using defaults");
            FanoutConfig::default()
        }
    };

    if let Some(unit_cost_ms) = args.unit_cost_ms {
        info!(unit_cost_ms, "Overriding unit cost from CLI");
        config.dispatch.unit_cost_ms = unit_cost_ms;
    }
    if let Some(deadline_ms) = args.deadline_ms {
        info!(deadline_ms, "Overriding deadline from CLI");
        config.dispatch.deadline_ms = deadline_ms;
    }
    if let Some(sink) = args.sink {
        config.status.sink = sink.into();
    }

    // Overrides must satisfy the same rules as the file
    let serialized = ConfigLoader::to_json(&config)?;
    ConfigLoader::load_from_str(&serialized, config_loader::ConfigFormat::Json)
        .context("Invalid configuration after CLI overrides")
}

fn load_config_file(path: &Path) -> Result<FanoutConfig> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }
    ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
