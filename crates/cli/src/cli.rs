//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::StatusSinkKind;

/// Fanout - run independent calls concurrently and join under a deadline
#[derive(Parser, Debug)]
#[command(
    name = "fanout",
    author,
    version,
    about = "Concurrent fan-out of independent calls with a join deadline",
    long_about = "Decodes a document listing call targets, runs one worker per target \n\
                  concurrently, waits for all of them or for a deadline, and reports \n\
                  per-call outcomes and total elapsed time."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FANOUT_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "FANOUT_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch the document's nodes and wait for them
    Run(RunArgs),

    /// Validate configuration (and optionally a document) without running
    Validate(ValidateArgs),

    /// Display the decoded document
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "FANOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the input document; the built-in sample is used when omitted
    #[arg(short, long, env = "FANOUT_DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Override the simulated cost of one call (milliseconds)
    #[arg(long, env = "FANOUT_UNIT_COST_MS")]
    pub unit_cost_ms: Option<u64>,

    /// Override the join deadline (milliseconds)
    #[arg(long, env = "FANOUT_DEADLINE_MS")]
    pub deadline_ms: Option<u64>,

    /// Override where status lines go
    #[arg(long, value_enum)]
    pub sink: Option<SinkArg>,

    /// Number of independent dispatches of the same document
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Print each dispatch report as JSON
    #[arg(long)]
    pub json: bool,

    /// Decode and validate inputs, then exit without dispatching
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "FANOUT_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "fanout.toml")]
    pub config: PathBuf,

    /// Also check that this document decodes
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the input document; the built-in sample is used when omitted
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Status sink selection
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SinkArg {
    /// Plain lines on stdout
    Stdout,
    /// Structured log events
    Log,
}

impl From<SinkArg> for StatusSinkKind {
    fn from(sink: SinkArg) -> Self {
        match sink {
            SinkArg::Stdout => Self::Stdout,
            SinkArg::Log => Self::Log,
        }
    }
}
