//! # Bounded Dynamic Executor
//!
//! Runs a sequence of items with a fixed number of concurrent workers pulling
//! dynamically from a shared cursor. Group execution time is highly variable
//! (one test class may run in microseconds, another in minutes), so static
//! index slicing would strand fast workers idle behind one overloaded worker.
//! Every worker instead claims the next unclaimed item until the cursor is
//! exhausted.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error};

/// Worker pool primitive with a shared forward-only cursor.
///
/// Exactly `concurrency` tokio tasks are spawned per [`run`](Self::run) call;
/// each terminates independently once nothing remains to claim.
#[derive(Debug, Clone)]
pub struct BoundedDynamicExecutor {
    concurrency: usize,
}

impl BoundedDynamicExecutor {
    /// Create an executor with the given worker count. A count of zero is
    /// clamped to one so `run` always makes progress.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `action` over every item, at most `concurrency` at a time.
    ///
    /// Returns once all items have been processed. A panicking action loses
    /// its worker but does not tear down the pool; remaining workers drain the
    /// cursor.
    pub async fn run<T, F, Fut>(&self, items: Vec<T>, action: F)
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if items.is_empty() {
            return;
        }

        debug!(
            item_count = items.len(),
            workers = self.concurrency,
            "starting bounded dynamic execution"
        );

        let cursor = Arc::new(Mutex::new(items.into_iter()));
        let action = Arc::new(action);

        let mut handles = Vec::with_capacity(self.concurrency);
        for _ in 0..self.concurrency {
            let cursor = Arc::clone(&cursor);
            let action = Arc::clone(&action);
            handles.push(tokio::spawn(async move {
                loop {
                    // Claim under the lock, run outside it.
                    let next = { cursor.lock().next() };
                    match next {
                        Some(item) => action(item).await,
                        None => break,
                    }
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "bounded executor worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn processes_every_item_exactly_once() {
        let seen = Arc::new(AtomicUsize::new(0));
        let executor = BoundedDynamicExecutor::new(4);
        let counter = Arc::clone(&seen);
        executor
            .run((0..100).collect(), move |_item: i32| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;
        assert_eq!(seen.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn respects_the_concurrency_ceiling() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let executor = BoundedDynamicExecutor::new(3);

        let active_c = Arc::clone(&active);
        let max_c = Arc::clone(&max_active);
        executor
            .run((0..20).collect(), move |_item: i32| {
                let active = Arc::clone(&active_c);
                let max_active = Arc::clone(&max_c);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_active.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .await;

        assert!(max_active.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn fast_workers_drain_the_cursor_past_a_slow_item() {
        // One deliberately slow item must not block the remaining work: with
        // dynamic pull the other workers keep claiming while it sleeps.
        let done = Arc::new(AtomicUsize::new(0));
        let executor = BoundedDynamicExecutor::new(2);
        let counter = Arc::clone(&done);
        executor
            .run((0..10).collect(), move |item: i32| {
                let counter = Arc::clone(&counter);
                async move {
                    if item == 0 {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;
        assert_eq!(done.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn empty_input_returns_immediately() {
        let executor = BoundedDynamicExecutor::new(8);
        executor
            .run(Vec::<i32>::new(), |_item| async {})
            .await;
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped() {
        let executor = BoundedDynamicExecutor::new(0);
        assert_eq!(executor.concurrency(), 1);
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        executor
            .run(vec![1, 2, 3], move |_item: i32| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
