//! CompletionLatch - wait for N independent completions or a deadline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Count-down latch shared by the workers of one dispatch
///
/// Each worker counts down exactly once. Counting below zero is a no-op.
#[derive(Debug)]
pub struct CompletionLatch {
    remaining: AtomicUsize,
    notify: Notify,
}

impl CompletionLatch {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            notify: Notify::new(),
        }
    }

    /// Signals still outstanding
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Signal one completion, returning the remaining count
    pub fn count_down(&self) -> usize {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(1) => {
                self.notify.notify_waiters();
                0
            }
            Ok(prev) => prev - 1,
            Err(_) => 0,
        }
    }

    /// Wait until the count reaches zero
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a count_down in between is not lost.
            notified.as_mut().enable();
            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait until the count reaches zero or `timeout` elapses
    ///
    /// Returns `true` if every completion was signaled in time.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_zero_count_returns_immediately() {
        let latch = CompletionLatch::new(0);
        assert!(latch.wait_timeout(Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_count_down_saturates() {
        let latch = CompletionLatch::new(1);
        assert_eq!(latch.count_down(), 0);
        assert_eq!(latch.count_down(), 0);
        assert_eq!(latch.remaining(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_count_down() {
        let latch = Arc::new(CompletionLatch::new(16));

        for i in 0..16u64 {
            let latch = Arc::clone(&latch);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(i)).await;
                latch.count_down();
            });
        }

        assert!(latch.wait_timeout(Duration::from_secs(2)).await);
        assert_eq!(latch.remaining(), 0);
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let latch = CompletionLatch::new(2);
        latch.count_down();

        let start = Instant::now();
        assert!(!latch.wait_timeout(Duration::from_millis(30)).await);
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(latch.remaining(), 1);
    }
}
