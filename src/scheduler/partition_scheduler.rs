//! # Partition Scheduler
//!
//! ## Architecture: Sequential Partition Lifecycle, Concurrent Group Execution
//!
//! The scheduler drives every partition to completion and produces one
//! aggregated [`RunReport`]. Partitions run strictly sequentially so that two
//! shared resources are never live at the same time; work *within* a partition
//! is dispatched across a [`BoundedDynamicExecutor`] worker pool.
//!
//! ## Per-Partition Lifecycle
//!
//! ```text
//! Pending → NameFiltered (terminal)
//!         | AllSkipped   (terminal)
//!         | Initializing → InitFailed → Disposing → Failed    (terminal)
//!                        | Running    → Disposing → Completed (terminal)
//! ```
//!
//! `Disposing` is reached unconditionally from both `InitFailed` and
//! `Running`: a resource whose initialization was attempted is always disposed
//! exactly once, even under cancellation.
//!
//! ## Failure policy
//!
//! Only a missing resource instance (configuration fault) aborts the run.
//! Resource initialization failures are recovered at partition scope by
//! synthesizing failed results for every unit; group-level failures are plain
//! data in the returned summaries; cancellation is a quiet early-stop.

use chrono::Utc;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::PartitionOptions;
use crate::error::{Result, SchedulerError};
use crate::execution::bounded_executor::BoundedDynamicExecutor;
use crate::execution::shutdown::ShutdownSignal;
use crate::scheduler::group_executor::GroupExecutor;
use crate::scheduler::partition_builder::PartitionBuilder;
use crate::scheduler::resource::ResourceProvider;
use crate::scheduler::resource_registry::ResourceRegistry;
use crate::scheduler::summary::{FailureRecord, PartitionTiming, RunReport, RunSummary};
use crate::scheduler::types::{ExecutionGroup, Partition, ResourceKey};

/// Partition name reported for failures in keyless groups.
const UNKEYED_PARTITION_NAME: &str = "UNKNOWN";

/// Effective worker count for a resource-keyed partition.
///
/// The declared ceiling raises the floor rather than capping it; a resource
/// declaring less concurrency than the process default still runs at the
/// default.
pub(crate) fn effective_concurrency(declared: Option<usize>, default_concurrency: usize) -> usize {
    default_concurrency.max(declared.unwrap_or(0))
}

/// Mutable accumulation shared by the coordinating task and the worker pool.
#[derive(Default)]
struct RunState {
    summaries: parking_lot::Mutex<Vec<RunSummary>>,
    failed: parking_lot::Mutex<Vec<FailureRecord>>,
}

impl RunState {
    fn record_summary(&self, summary: RunSummary) {
        self.summaries.lock().push(summary);
    }

    fn record_failure(&self, record: FailureRecord) {
        self.failed.lock().push(record);
    }

    fn fold_summary(&self) -> RunSummary {
        self.summaries.lock().iter().copied().sum()
    }

    fn take_failures(&self) -> Vec<FailureRecord> {
        std::mem::take(&mut *self.failed.lock())
    }
}

/// Orchestrates partition lifecycles, filters, and result aggregation.
pub struct PartitionScheduler {
    options: PartitionOptions,
    registry: ResourceRegistry,
    executor: Arc<dyn GroupExecutor>,
}

impl PartitionScheduler {
    pub fn new(options: PartitionOptions, executor: Arc<dyn GroupExecutor>) -> Self {
        Self {
            options,
            registry: ResourceRegistry::new(),
            executor,
        }
    }

    /// The per-run resource cache, exposed so execution layers can inject
    /// resource instances into the groups they run.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Run every execution group to completion.
    ///
    /// Groups are partitioned by resource key, resources are constructed
    /// eagerly for all observed keys, and partitions then execute in ascending
    /// group-count order. The returned report carries the folded summary, the
    /// failure ledger, and per-partition timings in execution order.
    #[instrument(skip_all, fields(group_count = groups.len()))]
    pub async fn run(
        &self,
        groups: Vec<ExecutionGroup>,
        provider: &dyn ResourceProvider,
        shutdown: ShutdownSignal,
    ) -> Result<RunReport> {
        let started_at = Utc::now();
        let partitions = PartitionBuilder::build(groups);

        // Instances must exist ahead of execution for dependency injection,
        // independent of filters.
        self.registry
            .populate(partitions.iter().filter_map(|p| p.key.as_ref()), provider);

        let state = Arc::new(RunState::default());
        let mut timings = Vec::new();

        for partition in &partitions {
            if shutdown.is_triggered() {
                info!("shutdown requested; not launching further partitions");
                break;
            }
            match &partition.key {
                None => {
                    self.run_groups(
                        partition.groups.clone(),
                        UNKEYED_PARTITION_NAME.to_string(),
                        self.options.default_concurrency,
                        &state,
                        &shutdown,
                    )
                    .await;
                }
                Some(key) => {
                    self.run_keyed_partition(key, partition, &state, &mut timings, &shutdown)
                        .await?;
                }
            }
        }

        let summary = state.fold_summary();
        let failed = state.take_failures();
        info!(
            total = summary.total,
            failed = summary.failed,
            skipped = summary.skipped,
            partitions = partitions.len(),
            "partitioned run complete"
        );

        Ok(RunReport {
            summary,
            failed,
            timings,
            started_at,
            completed_at: Utc::now(),
        })
    }

    async fn run_keyed_partition(
        &self,
        key: &ResourceKey,
        partition: &Partition,
        state: &Arc<RunState>,
        timings: &mut Vec<PartitionTiming>,
        shutdown: &ShutdownSignal,
    ) -> Result<()> {
        let resource =
            self.registry
                .get(key)
                .ok_or_else(|| SchedulerError::MissingResource {
                    key: key.clone(),
                    group: partition.representative_label().to_string(),
                })?;
        let partition_name = resource.name().to_string();

        if let Some(filter) = &self.options.partition_filter {
            if !filter.is_match(&partition_name) {
                info!(
                    partition = %partition_name,
                    filter = filter.as_str(),
                    "partition excluded by name filter"
                );
                let reason = format!("Unmatched: '{filter}' for partition: '{partition_name}'");
                for group in &partition.groups {
                    let summary = self.executor.skip(group, &reason).await;
                    state.record_summary(summary);
                }
                return Ok(());
            }
        }

        if partition.all_units_skipped() {
            debug!(
                partition = %partition_name,
                units = partition.unit_count(),
                "all work units pre-skipped; resource lifecycle not started"
            );
            state.record_summary(RunSummary::skipped(partition.unit_count() as u64));
            return Ok(());
        }

        let timer = Instant::now();
        match resource.initialize().await {
            Ok(()) => {
                let concurrency = effective_concurrency(
                    resource.max_concurrency(),
                    self.options.default_concurrency,
                );
                info!(
                    partition = %partition_name,
                    groups = partition.group_count(),
                    concurrency,
                    "partition resource initialized"
                );
                self.run_groups(
                    partition.groups.clone(),
                    partition_name.clone(),
                    concurrency,
                    state,
                    shutdown,
                )
                .await;
            }
            Err(e) => {
                error!(
                    partition = %partition_name,
                    error = %e,
                    "resource initialization failed; failing every unit in the partition"
                );
                let diagnostic = resource.failure_diagnostic();
                let message = e.to_string();
                for group in &partition.groups {
                    let summary = self.executor.fail(group, &message, &diagnostic).await;
                    if summary.has_failures() {
                        state.record_failure(FailureRecord::new(
                            partition_name.clone(),
                            group.label.clone(),
                        ));
                    }
                    state.record_summary(summary);
                }
            }
        }

        // Disposal is unconditional once initialization was attempted.
        resource.dispose().await;
        timings.push(PartitionTiming {
            partition: partition_name,
            elapsed: timer.elapsed(),
        });
        Ok(())
    }

    /// Dispatch the groups of one partition across the bounded worker pool,
    /// applying the per-group name filter to each group as it is claimed.
    async fn run_groups(
        &self,
        groups: Vec<ExecutionGroup>,
        partition_name: String,
        concurrency: usize,
        state: &Arc<RunState>,
        shutdown: &ShutdownSignal,
    ) {
        let executor = Arc::clone(&self.executor);
        let group_filter: Option<Regex> = self.options.group_filter.clone();
        let state = Arc::clone(state);
        let shutdown = shutdown.clone();
        let partition_name = Arc::new(partition_name);

        let pool = BoundedDynamicExecutor::new(concurrency);
        pool.run(groups, move |group| {
            let executor = Arc::clone(&executor);
            let group_filter = group_filter.clone();
            let state = Arc::clone(&state);
            let shutdown = shutdown.clone();
            let partition_name = Arc::clone(&partition_name);
            async move {
                if shutdown.is_triggered() {
                    debug!(group = %group.label, "shutdown requested; group not started");
                    return;
                }

                if let Some(filter) = &group_filter {
                    if !filter.is_match(&group.label) {
                        let reason = format!("Unmatched: '{filter}', test class: '{}'", group.label);
                        let summary = executor.skip(&group, &reason).await;
                        state.record_summary(summary);
                        return;
                    }
                }

                match executor.run(&group, &shutdown).await {
                    Ok(summary) => {
                        if summary.has_failures() {
                            state.record_failure(FailureRecord::new(
                                partition_name.as_str(),
                                group.label.clone(),
                            ));
                        }
                        state.record_summary(summary);
                    }
                    Err(cancelled) => {
                        // The group contributes nothing; results already
                        // recorded by other groups stay intact.
                        warn!(group = %group.label, "{cancelled}");
                    }
                }
            }
        })
        .await;
    }
}

/// Run a partitioned suite with the host lifecycle hooks wired around it.
///
/// The hooks configured on `options` are invoked here, not inside the
/// scheduler: `on_before_run` before anything executes, `on_tests_finished`
/// with the timing list and failure ledger once the run completes. A
/// configuration fault propagates without invoking the completion hook.
pub async fn run_partitioned(
    options: PartitionOptions,
    groups: Vec<ExecutionGroup>,
    provider: &dyn ResourceProvider,
    executor: Arc<dyn GroupExecutor>,
    shutdown: ShutdownSignal,
) -> Result<RunReport> {
    let hooks = Arc::clone(&options.hooks);
    let scheduler = PartitionScheduler::new(options, executor);

    hooks.on_before_run();
    let report = scheduler.run(groups, provider, shutdown).await?;
    hooks.on_tests_finished(&report.timings, &report.failed);
    Ok(report)
}
