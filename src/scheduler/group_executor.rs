//! External execution collaborator contract.
//!
//! The scheduler never runs a work unit itself; it delegates each execution
//! group to a [`GroupExecutor`] and folds the returned summaries. The same
//! collaborator also reports synthesized skips and failures so the host's
//! progress/reporting pipeline sees every unit exactly once.

use async_trait::async_trait;
use std::fmt;
use tracing::debug;

use crate::execution::shutdown::ShutdownSignal;
use crate::scheduler::summary::RunSummary;
use crate::scheduler::types::ExecutionGroup;

/// Raised by an executor when the shutdown signal interrupted a group mid
/// flight. The scheduler swallows it: the group contributes an empty summary
/// and already-completed groups keep their counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCancelled;

impl fmt::Display for GroupCancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group execution cancelled")
    }
}

impl std::error::Error for GroupCancelled {}

#[async_trait]
pub trait GroupExecutor: Send + Sync {
    /// Execute every unit of `group` and report its summary.
    ///
    /// Implementations should stop promptly once `shutdown` triggers and
    /// return `Err(GroupCancelled)` for work that never completed.
    async fn run(
        &self,
        group: &ExecutionGroup,
        shutdown: &ShutdownSignal,
    ) -> Result<RunSummary, GroupCancelled>;

    /// Report every unit of `group` as skipped without running it.
    ///
    /// Override to emit host-specific progress events; the default only
    /// accounts for the units.
    async fn skip(&self, group: &ExecutionGroup, reason: &str) -> RunSummary {
        debug!(group = %group.label, reason, "skipping group");
        RunSummary::skipped(group.unit_count() as u64)
    }

    /// Report every unit of `group` as failed without running it, tagged with
    /// the captured error and the resource's diagnostic output.
    async fn fail(&self, group: &ExecutionGroup, error: &str, diagnostic: &str) -> RunSummary {
        debug!(group = %group.label, error, diagnostic, "failing group");
        RunSummary::failed(group.unit_count() as u64)
    }
}
