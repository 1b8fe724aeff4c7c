//! MemorySink - keeps every event in memory

use std::sync::{Mutex, MutexGuard};

use contracts::{StatusEvent, StatusSink};

/// Sink that records events in emission order
///
/// Useful for tests and for callers that render status themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<StatusEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far
    pub fn events(&self) -> Vec<StatusEvent> {
        self.lock().clone()
    }

    /// Rendered status lines
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    /// Number of events matching `pred`
    pub fn count(&self, pred: impl Fn(&StatusEvent) -> bool) -> usize {
        self.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StatusEvent>> {
        // A panicking emitter cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StatusSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn emit(&self, event: &StatusEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(&StatusEvent::Started {
            label: "a".to_string(),
            worker_id: "worker-1".to_string(),
        });
        sink.emit(&StatusEvent::Done {
            label: "a".to_string(),
        });

        assert_eq!(sink.lines(), vec!["start: a (worker-1)", "done: a"]);
        assert_eq!(
            sink.count(|e| matches!(e, StatusEvent::Done { .. })),
            1
        );

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
