//! RemoteCall trait - unit-of-work interface
//!
//! The dispatcher runs one call per work item. A call suspends exactly once;
//! the dispatcher races that suspension against the shutdown signal, so
//! implementations do not need their own cancellation handling.

use thiserror::Error;

use crate::WorkItem;

/// Error returned by a single call
#[derive(Debug, Clone, Error)]
#[error("call to '{target}' failed: {message}")]
pub struct CallError {
    pub target: String,
    pub message: String,
}

impl CallError {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Unit-of-work trait
///
/// All call implementations must implement this trait.
#[trait_variant::make(RemoteCall: Send)]
pub trait LocalRemoteCall {
    /// Call name (used for logging)
    fn name(&self) -> &str;

    /// Perform the call for `item`
    ///
    /// # Errors
    /// Returns a call error (should include the target)
    async fn call(&self, item: &WorkItem) -> Result<(), CallError>;
}
