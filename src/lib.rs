#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Partition Core
//!
//! Partition scheduler and bounded-concurrency executor for fixture-bound test
//! workloads.
//!
//! ## Overview
//!
//! Large test suites bundle many independent work units (test cases) into
//! execution groups (test classes/collections). Some groups depend on a shared,
//! expensive, long-lived resource such as a running cluster or a seeded
//! database. This crate runs as much of that work concurrently as possible
//! while guaranteeing at most one live instance and one initialize/dispose
//! cycle per distinct shared resource per run, and while never overlapping the
//! lifetime windows of two different resources.
//!
//! ## Architecture
//!
//! - **[`PartitionBuilder`]**: buckets execution groups by their declared
//!   resource key and orders partitions ascending by group count so small,
//!   fast partitions run and report early
//! - **[`ResourceRegistry`]**: creates-once / caches one [`ResourceLifetime`]
//!   instance per resource key for the duration of a run
//! - **[`PartitionScheduler`]**: drives every partition to completion
//!   (initialize → bounded run → dispose), applies name filters, synthesizes
//!   skip/failure results, and aggregates one [`RunReport`]
//! - **[`BoundedDynamicExecutor`]**: N workers pulling dynamically from a
//!   shared cursor, so fast workers are never stranded behind a slow one
//!
//! Group discovery and the actual execution of a group are external
//! collaborators, expressed through the [`GroupExecutor`] and
//! [`ResourceProvider`] traits.
//!
//! ## Usage
//!
//! ```rust
//! use partition_core::{
//!     ExecutionGroup, GroupCancelled, GroupExecutor, PartitionOptions, ResourceKey,
//!     ResourceLifetime, ResourceProvider, RunSummary, ShutdownController, ShutdownSignal,
//!     WorkUnit, run_partitioned,
//! };
//! use std::sync::Arc;
//!
//! struct ClusterFixture;
//!
//! #[async_trait::async_trait]
//! impl ResourceLifetime for ClusterFixture {
//!     async fn initialize(&self) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!     async fn dispose(&self) {}
//!     fn name(&self) -> &str {
//!         "ClusterFixture"
//!     }
//! }
//!
//! struct Fixtures;
//!
//! impl ResourceProvider for Fixtures {
//!     fn create(&self, _key: &ResourceKey) -> anyhow::Result<Arc<dyn ResourceLifetime>> {
//!         Ok(Arc::new(ClusterFixture))
//!     }
//! }
//!
//! struct Runner;
//!
//! #[async_trait::async_trait]
//! impl GroupExecutor for Runner {
//!     async fn run(
//!         &self,
//!         group: &ExecutionGroup,
//!         _shutdown: &ShutdownSignal,
//!     ) -> Result<RunSummary, GroupCancelled> {
//!         Ok(RunSummary::passed(group.units.len() as u64))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let groups = vec![
//!     ExecutionGroup::new("FreeTests", vec![WorkUnit::new("t1", "test one")]),
//!     ExecutionGroup::new("ClusterTests", vec![WorkUnit::new("t2", "test two")])
//!         .with_resource(ResourceKey::new("cluster")),
//! ];
//!
//! let (_controller, shutdown) = ShutdownController::new();
//! let report = run_partitioned(
//!     PartitionOptions::default(),
//!     groups,
//!     &Fixtures,
//!     Arc::new(Runner),
//!     shutdown,
//! )
//! .await
//! .expect("all resources resolve");
//!
//! assert_eq!(report.summary.total, 2);
//! assert_eq!(report.summary.failed, 0);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod scheduler;

pub use config::{default_concurrency, NoopHooks, PartitionHooks, PartitionOptions};
pub use error::{Result, SchedulerError};
pub use execution::bounded_executor::BoundedDynamicExecutor;
pub use execution::shutdown::{ShutdownController, ShutdownSignal};
pub use scheduler::group_executor::{GroupCancelled, GroupExecutor};
pub use scheduler::partition_builder::PartitionBuilder;
pub use scheduler::partition_scheduler::{run_partitioned, PartitionScheduler};
pub use scheduler::resource::{ResourceLifetime, ResourceProvider};
pub use scheduler::resource_registry::ResourceRegistry;
pub use scheduler::summary::{FailureRecord, PartitionTiming, RunReport, RunSummary};
pub use scheduler::types::{ExecutionGroup, Partition, ResourceKey, WorkUnit};
