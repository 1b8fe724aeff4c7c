//! StdoutSink - one plain line per event

use contracts::{StatusEvent, StatusSink};

pub struct StdoutSink {
    name: String,
}

impl StdoutSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StatusSink for StdoutSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, event: &StatusEvent) {
        match event {
            StatusEvent::Interrupted { .. } | StatusEvent::Failed { .. } => eprintln!("{event}"),
            _ => println!("{event}"),
        }
    }
}
