//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use work_source::DocumentSource;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    unit_cost_ms: u64,
    deadline_ms: u64,
    sink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_nodes: Option<usize>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return invalid(config_path, format!("File not found: {}", args.config.display()));
    }

    let config = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => config,
        Err(e) => return invalid(config_path, e.to_string()),
    };

    let document_nodes = match args.document.as_deref() {
        Some(path) => match DocumentSource::load_from_path(path) {
            Ok(document) => Some(document.node_count()),
            Err(e) => return invalid(config_path, e.to_string()),
        },
        None => None,
    };

    let mut warnings = config_loader::ConfigLoader::warnings(&config);
    if document_nodes == Some(0) {
        warnings.push("Document has no nodes - dispatch will be a no-op".to_string());
    }

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ConfigSummary {
            version: format!("{:?}", config.version),
            unit_cost_ms: config.dispatch.unit_cost_ms,
            deadline_ms: config.dispatch.deadline_ms,
            sink: format!("{:?}", config.status.sink),
            document_nodes,
        }),
    }
}

fn invalid(config_path: String, error: String) -> ValidationResult {
    ValidationResult {
        valid: false,
        config_path,
        error: Some(error),
        warnings: None,
        summary: None,
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Unit cost: {} ms", summary.unit_cost_ms);
            println!("  Deadline: {} ms", summary.deadline_ms);
            println!("  Status sink: {}", summary.sink);
            if let Some(nodes) = summary.document_nodes {
                println!("  Document nodes: {}", nodes);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
