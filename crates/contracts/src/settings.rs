//! FanoutConfig - Config Loader output
//!
//! Durations are stored as milliseconds in configuration files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FanoutConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    pub dispatch: DispatchSettings,

    #[serde(default)]
    pub status: StatusConfig,
}

/// Timing of a dispatch
///
/// `deadline_ms` is expected to be strictly greater than `unit_cost_ms`;
/// otherwise every dispatch resolves through the timeout path. This is a
/// caller responsibility and is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Simulated cost of one unit of work
    #[serde(default = "default_unit_cost_ms")]
    pub unit_cost_ms: u64,

    /// Overall join deadline
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

fn default_unit_cost_ms() -> u64 {
    60_000
}

fn default_deadline_ms() -> u64 {
    120_000
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            unit_cost_ms: default_unit_cost_ms(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl DispatchSettings {
    pub fn new(unit_cost: Duration, deadline: Duration) -> Self {
        Self {
            unit_cost_ms: unit_cost.as_millis() as u64,
            deadline_ms: deadline.as_millis() as u64,
        }
    }

    pub fn unit_cost(&self) -> Duration {
        Duration::from_millis(self.unit_cost_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// True if the deadline leaves room for a unit of work to finish
    pub fn deadline_covers_unit_cost(&self) -> bool {
        self.deadline_ms > self.unit_cost_ms
    }
}

/// Status output routing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub sink: StatusSinkKind,
}

/// Status sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSinkKind {
    /// Plain lines on stdout
    #[default]
    Stdout,
    /// Structured `tracing` events
    Log,
}
