//! # Resource Registry
//!
//! Creates-once / caches shared resource instances keyed by [`ResourceKey`].
//!
//! The registry is an explicit value owned by one scheduler run rather than a
//! process-wide static, so multiple runs in the same process stay isolated.
//! It is populated for every observed key right after partitioning completes,
//! before any partition executes and independent of filters, because the
//! execution layer may need the instances for dependency injection.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::scheduler::resource::{ResourceLifetime, ResourceProvider};
use crate::scheduler::types::ResourceKey;

#[derive(Default)]
pub struct ResourceRegistry {
    instances: DashMap<ResourceKey, Arc<dyn ResourceLifetime>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an instance for every key not already cached.
    ///
    /// Construction errors are captured and logged, not propagated; the key
    /// simply ends up with no instance, which the scheduler reports as a
    /// fatal configuration fault when the partition is reached.
    pub fn populate<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a ResourceKey>,
        provider: &dyn ResourceProvider,
    ) {
        for key in keys {
            if self.instances.contains_key(key) {
                continue;
            }
            match provider.create(key) {
                Ok(resource) => {
                    debug!(key = %key, resource = resource.name(), "constructed resource lifetime");
                    self.instances.insert(key.clone(), resource);
                }
                Err(e) => {
                    error!(key = %key, error = %e, "failed to construct resource lifetime");
                }
            }
        }
    }

    /// The cached instance for `key`, if construction succeeded.
    pub fn get(&self, key: &ResourceKey) -> Option<Arc<dyn ResourceLifetime>> {
        self.instances.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
