//! Shared resource lifecycle contracts.

use async_trait::async_trait;
use std::sync::Arc;

use crate::scheduler::types::ResourceKey;

/// The long-lived state a partition's groups depend on, such as a running
/// cluster or a seeded database.
///
/// Exactly one instance exists per resource key for the lifetime of one run.
/// The scheduler calls `initialize` at most once and `dispose` exactly as many
/// times as initialization was attempted, even when initialization fails.
/// Avoid expensive work in constructors; bootstrap in `initialize` and wind
/// down in `dispose`. During the running window the instance is read
/// concurrently by up to the effective concurrency ceiling of workers and must
/// manage its own interior synchronization.
#[async_trait]
pub trait ResourceLifetime: Send + Sync {
    /// Bring the resource into a usable state.
    async fn initialize(&self) -> anyhow::Result<()>;

    /// Release the resource. Must tolerate being called after a failed
    /// initialization.
    async fn dispose(&self);

    /// Safe concurrency ceiling declared by the resource owner, if any.
    fn max_concurrency(&self) -> Option<usize> {
        None
    }

    /// Extra output attached to synthesized failures when initialization
    /// fails, e.g. captured bootstrap logs.
    fn failure_diagnostic(&self) -> String {
        String::new()
    }

    /// Display name of the resource; doubles as the partition name that the
    /// partition filter matches against.
    fn name(&self) -> &str;
}

/// Construction seam supplied by discovery: given a resource key, build the
/// lifetime instance for it. Construction errors are captured by the registry
/// and surface later as a fatal configuration fault for that partition.
pub trait ResourceProvider: Send + Sync {
    fn create(&self, key: &ResourceKey) -> anyhow::Result<Arc<dyn ResourceLifetime>>;
}
