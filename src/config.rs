//! Run configuration and host lifecycle hooks.
//!
//! Options mirror what a test host typically wires in: two optional positive
//! name filters (only matches run), the process-wide default concurrency, and
//! a pair of hooks around the run. Filters can also come from the environment
//! for hosts that cannot thread options through their invocation path.

use regex::Regex;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::thread;

use crate::error::{Result, SchedulerError};
use crate::scheduler::summary::{FailureRecord, PartitionTiming};

const PARTITION_FILTER_ENV: &str = "PARTITION_FILTER";
const TEST_FILTER_ENV: &str = "TEST_FILTER";
const DEFAULT_CONCURRENCY_ENV: &str = "PARTITION_DEFAULT_CONCURRENCY";

/// Process-wide default concurrency ceiling: a small multiple of available
/// hardware parallelism.
pub fn default_concurrency() -> usize {
    let cpus = thread::available_parallelism().map_or(1, usize::from);
    cpus * 4
}

/// Lifecycle callbacks invoked by the run host around a scheduler run.
pub trait PartitionHooks: Send + Sync {
    /// Called before any partition executes. A good place to print run
    /// configuration to the console.
    fn on_before_run(&self) {}

    /// Called after a run completes, with per-partition timings in execution
    /// order and the failure ledger.
    fn on_tests_finished(&self, timings: &[PartitionTiming], failed: &[FailureRecord]) {
        let _ = (timings, failed);
    }
}

/// Default hooks that do nothing.
pub struct NoopHooks;

impl PartitionHooks for NoopHooks {}

/// Options controlling one partitioned run.
#[derive(Clone)]
pub struct PartitionOptions {
    /// Positive filter on partition (resource) names; only matches run.
    pub partition_filter: Option<Regex>,
    /// Positive filter on group labels; only matches run.
    pub group_filter: Option<Regex>,
    /// Concurrency used for keyless work and as the floor for keyed work.
    pub default_concurrency: usize,
    pub hooks: Arc<dyn PartitionHooks>,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            partition_filter: None,
            group_filter: None,
            default_concurrency: default_concurrency(),
            hooks: Arc::new(NoopHooks),
        }
    }
}

impl fmt::Debug for PartitionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionOptions")
            .field("partition_filter", &self.partition_filter.as_ref().map(Regex::as_str))
            .field("group_filter", &self.group_filter.as_ref().map(Regex::as_str))
            .field("default_concurrency", &self.default_concurrency)
            .finish_non_exhaustive()
    }
}

impl PartitionOptions {
    pub fn with_partition_filter(mut self, filter: Regex) -> Self {
        self.partition_filter = Some(filter);
        self
    }

    pub fn with_group_filter(mut self, filter: Regex) -> Self {
        self.group_filter = Some(filter);
        self
    }

    pub fn with_default_concurrency(mut self, concurrency: usize) -> Self {
        self.default_concurrency = concurrency;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn PartitionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Build options from `PARTITION_FILTER`, `TEST_FILTER`, and
    /// `PARTITION_DEFAULT_CONCURRENCY` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Ok(pattern) = env::var(PARTITION_FILTER_ENV) {
            options.partition_filter = Some(parse_filter(&pattern)?);
        }
        if let Ok(pattern) = env::var(TEST_FILTER_ENV) {
            options.group_filter = Some(parse_filter(&pattern)?);
        }
        if let Ok(value) = env::var(DEFAULT_CONCURRENCY_ENV) {
            if let Ok(concurrency) = value.parse::<usize>() {
                options.default_concurrency = concurrency.max(1);
            }
        }
        Ok(options)
    }
}

fn parse_filter(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| SchedulerError::InvalidFilter {
        pattern: pattern.to_string(),
        source,
    })
}
