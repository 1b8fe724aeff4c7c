//! WorkerPool - one worker per work item, scoped to a single dispatch

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::DispatcherError;

/// Shared view of whether the pool was released
///
/// Workers consult it to decide whether their result is still wanted.
#[derive(Debug, Clone, Default)]
pub struct PoolState {
    released: Arc<AtomicBool>,
}

impl PoolState {
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn mark_released(&self) -> bool {
        !self.released.swap(true, Ordering::AcqRel)
    }
}

/// Fixed-size pool of spawned workers
///
/// Spawns at most `capacity` workers, never reuses one, and refuses new
/// work once released. Dropping the pool releases it; workers that are
/// still running are detached, not aborted.
#[derive(Debug)]
pub struct WorkerPool {
    capacity: usize,
    workers: Vec<JoinHandle<()>>,
    spawned: usize,
    state: PoolState,
}

impl WorkerPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            workers: Vec::with_capacity(capacity),
            spawned: 0,
            state: PoolState::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of workers spawned so far
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn state(&self) -> PoolState {
        self.state.clone()
    }

    /// Spawn a new worker
    ///
    /// `make_task` receives the worker id and returns the worker body.
    ///
    /// # Errors
    /// `PoolReleased` after release, `PoolExhausted` once `capacity`
    /// workers exist.
    pub fn submit<F, Fut>(&mut self, make_task: F) -> Result<String, DispatcherError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.state.is_released() {
            return Err(DispatcherError::PoolReleased);
        }
        if self.spawned >= self.capacity {
            return Err(DispatcherError::pool_exhausted(self.capacity));
        }

        self.spawned += 1;
        let worker_id = format!("worker-{}", self.spawned);
        self.workers.push(tokio::spawn(make_task(worker_id.clone())));
        Ok(worker_id)
    }

    /// Release the pool
    ///
    /// Returns how many workers were still running; they are detached and
    /// left to finish on their own. Idempotent.
    pub fn release(&mut self) -> usize {
        if !self.state.mark_released() {
            return 0;
        }

        let running = self.workers.iter().filter(|w| !w.is_finished()).count();
        self.workers.clear();

        debug!(
            spawned = self.spawned,
            running, "Worker pool released"
        );
        running
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.release();
    }
}
