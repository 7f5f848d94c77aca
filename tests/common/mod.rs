//! Shared test doubles for scheduler integration tests.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use partition_core::{
    ExecutionGroup, GroupCancelled, GroupExecutor, ResourceKey, ResourceLifetime,
    ResourceProvider, RunSummary, ShutdownController, ShutdownSignal, WorkUnit,
};

/// Resource double that counts lifecycle calls.
pub struct TestResource {
    pub name: String,
    pub fail_init: bool,
    pub declared_concurrency: Option<usize>,
    pub init_calls: AtomicUsize,
    pub dispose_calls: AtomicUsize,
}

impl TestResource {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_init: false,
            declared_concurrency: None,
            init_calls: AtomicUsize::new(0),
            dispose_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_init: true,
            declared_concurrency: None,
            init_calls: AtomicUsize::new(0),
            dispose_calls: AtomicUsize::new(0),
        })
    }

    pub fn with_concurrency(name: &str, declared: usize) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_init: false,
            declared_concurrency: Some(declared),
            init_calls: AtomicUsize::new(0),
            dispose_calls: AtomicUsize::new(0),
        })
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn dispose_count(&self) -> usize {
        self.dispose_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceLifetime for TestResource {
    async fn initialize(&self) -> anyhow::Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            anyhow::bail!("bootstrap of '{}' failed", self.name);
        }
        Ok(())
    }

    async fn dispose(&self) {
        self.dispose_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn max_concurrency(&self) -> Option<usize> {
        self.declared_concurrency
    }

    fn failure_diagnostic(&self) -> String {
        format!("diagnostic output for {}", self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Provider backed by a fixed key → resource map.
#[derive(Default)]
pub struct MapProvider {
    resources: HashMap<ResourceKey, Arc<TestResource>>,
    pub create_calls: AtomicUsize,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, resource: Arc<TestResource>) -> Self {
        self.resources.insert(ResourceKey::new(key), resource);
        self
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for MapProvider {
    fn create(&self, key: &ResourceKey) -> anyhow::Result<Arc<dyn ResourceLifetime>> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.resources
            .get(key)
            .cloned()
            .map(|r| r as Arc<dyn ResourceLifetime>)
            .ok_or_else(|| anyhow::anyhow!("no resource registered for key '{key}'"))
    }
}

/// Executor double that records what it was asked to do and tracks observed
/// concurrency.
#[derive(Default)]
pub struct RecordingExecutor {
    /// Groups whose summaries should report one failed unit.
    pub failing_groups: HashSet<String>,
    /// Groups that report cancellation instead of a summary.
    pub cancelled_groups: HashSet<String>,
    /// Simulated per-group execution time.
    pub delay: Duration,
    /// Trigger this controller once `ran` reaches the given count.
    pub cancel_after: Option<(usize, Arc<ShutdownController>)>,
    pub ran: Mutex<Vec<String>>,
    pub skips: Mutex<Vec<(String, String)>>,
    pub fails: Mutex<Vec<(String, String, String)>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failing_group(mut self, label: &str) -> Self {
        self.failing_groups.insert(label.to_string());
        self
    }

    pub fn with_cancelled_group(mut self, label: &str) -> Self {
        self.cancelled_groups.insert(label.to_string());
        self
    }

    pub fn with_cancel_after(mut self, runs: usize, controller: Arc<ShutdownController>) -> Self {
        self.cancel_after = Some((runs, controller));
        self
    }

    pub fn ran_labels(&self) -> Vec<String> {
        self.ran.lock().clone()
    }

    pub fn max_observed_concurrency(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupExecutor for RecordingExecutor {
    async fn run(
        &self,
        group: &ExecutionGroup,
        shutdown: &ShutdownSignal,
    ) -> Result<RunSummary, GroupCancelled> {
        if shutdown.is_triggered() || self.cancelled_groups.contains(&group.label) {
            return Err(GroupCancelled);
        }

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        self.ran.lock().push(group.label.clone());
        if let Some((after, controller)) = &self.cancel_after {
            if self.ran.lock().len() >= *after {
                controller.shutdown();
            }
        }

        let total = group.units.len() as u64;
        if self.failing_groups.contains(&group.label) {
            Ok(RunSummary {
                total,
                failed: 1,
                skipped: 0,
            })
        } else {
            Ok(RunSummary::passed(total))
        }
    }

    async fn skip(&self, group: &ExecutionGroup, reason: &str) -> RunSummary {
        self.skips
            .lock()
            .push((group.label.clone(), reason.to_string()));
        RunSummary::skipped(group.units.len() as u64)
    }

    async fn fail(&self, group: &ExecutionGroup, error: &str, diagnostic: &str) -> RunSummary {
        self.fails.lock().push((
            group.label.clone(),
            error.to_string(),
            diagnostic.to_string(),
        ));
        RunSummary::failed(group.units.len() as u64)
    }
}

/// A group of `units` single-unit work items, keyed if requested.
pub fn group_with_units(label: &str, units: usize, key: Option<&str>) -> ExecutionGroup {
    let units = (0..units)
        .map(|i| WorkUnit::new(format!("{label}-{i}"), format!("{label} case {i}")))
        .collect();
    let group = ExecutionGroup::new(label, units);
    match key {
        Some(k) => group.with_resource(ResourceKey::new(k)),
        None => group,
    }
}

pub fn skipped_group(label: &str, units: usize, key: &str) -> ExecutionGroup {
    let units = (0..units)
        .map(|i| {
            WorkUnit::new(format!("{label}-{i}"), format!("{label} case {i}"))
                .with_skip_reason("quarantined")
        })
        .collect();
    ExecutionGroup::new(label, units).with_resource(ResourceKey::new(key))
}
