//! # Partition Scheduling
//!
//! Groups fixture-bound execution groups into partitions, manages one shared
//! resource lifecycle per partition, and aggregates results.
//!
//! ## Core Components
//!
//! - **PartitionBuilder**: buckets groups by resource key, orders partitions
//!   ascending by group count
//! - **ResourceRegistry**: create-once cache of resource lifetime instances,
//!   owned by a single run
//! - **PartitionScheduler**: drives each partition through
//!   initialize → bounded run → dispose, applies filters, synthesizes skips
//!   and failures, records timings
//! - **RunSummary / RunReport**: commutative result accounting plus the
//!   failure ledger handed to the host afterwards
//!
//! Discovery and actual group execution live outside this crate, behind the
//! [`ResourceProvider`](resource::ResourceProvider) and
//! [`GroupExecutor`](group_executor::GroupExecutor) traits.

pub mod group_executor;
pub mod partition_builder;
pub mod partition_scheduler;
pub mod resource;
pub mod resource_registry;
pub mod summary;
pub mod types;

pub use group_executor::{GroupCancelled, GroupExecutor};
pub use partition_builder::PartitionBuilder;
pub use partition_scheduler::{run_partitioned, PartitionScheduler};
pub use resource::{ResourceLifetime, ResourceProvider};
pub use resource_registry::ResourceRegistry;
pub use summary::{FailureRecord, PartitionTiming, RunReport, RunSummary};
pub use types::{ExecutionGroup, Partition, ResourceKey, WorkUnit};
