//! Status sink implementations
//!
//! Contains LogSink, StdoutSink, and MemorySink.

mod log;
mod memory;
mod stdout;

use std::sync::Arc;

use contracts::{StatusSink, StatusSinkKind};

pub use self::log::LogSink;
pub use self::memory::MemorySink;
pub use self::stdout::StdoutSink;

/// Create a status sink from configuration
pub fn create_sink(kind: StatusSinkKind) -> Arc<dyn StatusSink> {
    match kind {
        StatusSinkKind::Stdout => Arc::new(StdoutSink::new("stdout")),
        StatusSinkKind::Log => Arc::new(LogSink::new("log")),
    }
}
