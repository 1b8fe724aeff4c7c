//! LogSink - routes status lines through tracing

use contracts::{StatusEvent, StatusSink};
use tracing::{info, warn};

/// Sink that logs status events
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StatusSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, event: &StatusEvent) {
        match event {
            StatusEvent::Interrupted { .. } | StatusEvent::Failed { .. } => {
                warn!(sink = %self.name, status = %event, "Status");
            }
            _ => info!(sink = %self.name, status = %event, "Status"),
        }
    }
}
