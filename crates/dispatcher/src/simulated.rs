//! SimulatedCall - stand-in for a remote call

use std::time::Duration;

use contracts::{CallError, RemoteCall, WorkItem};
use tracing::{instrument, trace};

/// Call that waits a fixed cost and succeeds
///
/// No network I/O happens; the sleep is the single suspension point.
#[derive(Debug, Clone)]
pub struct SimulatedCall {
    name: String,
    cost: Duration,
}

impl SimulatedCall {
    pub fn new(cost: Duration) -> Self {
        Self {
            name: "simulated".to_string(),
            cost,
        }
    }

    pub fn cost(&self) -> Duration {
        self.cost
    }
}

impl RemoteCall for SimulatedCall {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "simulated_call",
        skip(self, item),
        fields(url = %item.target(), cost_ms = self.cost.as_millis() as u64)
    )]
    async fn call(&self, item: &WorkItem) -> Result<(), CallError> {
        tokio::time::sleep(self.cost).await;
        trace!(label = %item.label(), "Simulated call returned");
        Ok(())
    }
}
