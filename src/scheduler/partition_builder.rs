//! # Partition Builder
//!
//! Buckets execution groups by resource key and orders the resulting
//! partitions ascending by member-group count, so small, fast partitions run
//! and report early. Ordering ties keep first-seen order (stable sort), and
//! the keyless partition is ordered like any other.

use std::collections::HashMap;
use tracing::debug;

use crate::scheduler::types::{ExecutionGroup, Partition, ResourceKey};

pub struct PartitionBuilder;

impl PartitionBuilder {
    /// Compute the complete, non-overlapping partition cover of `groups`.
    ///
    /// Every group lands in exactly one partition; groups whose units are all
    /// pre-skipped are still placed (the scheduler short-circuits them later
    /// without touching the resource lifecycle).
    pub fn build(groups: Vec<ExecutionGroup>) -> Vec<Partition> {
        let mut key_order: Vec<Option<ResourceKey>> = Vec::new();
        let mut buckets: HashMap<Option<ResourceKey>, Vec<ExecutionGroup>> = HashMap::new();

        for group in groups {
            let key = group.resource_key.clone();
            if !buckets.contains_key(&key) {
                key_order.push(key.clone());
            }
            buckets.entry(key).or_default().push(group);
        }

        let mut partitions: Vec<Partition> = key_order
            .into_iter()
            .map(|key| {
                let groups = buckets.remove(&key).unwrap_or_default();
                Partition { key, groups }
            })
            .collect();

        partitions.sort_by_key(Partition::group_count);

        debug!(
            partition_count = partitions.len(),
            "partitioned execution groups"
        );
        partitions
    }
}
