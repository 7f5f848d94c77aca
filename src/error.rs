//! Structured error handling for the partition scheduler.
//!
//! Only [`SchedulerError::MissingResource`] aborts a run; every other fault is
//! absorbed into [`RunSummary`](crate::RunSummary) and
//! [`FailureRecord`](crate::FailureRecord) data so a run always produces a
//! complete, accountable summary.

use thiserror::Error;

use crate::scheduler::types::ResourceKey;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A resource key is known from grouping but no lifetime instance could be
    /// constructed for it. This is a configuration fault and fatal to the run.
    #[error("resource '{key}' did not yield partition state for e.g: {group}")]
    MissingResource { key: ResourceKey, group: String },

    /// A name filter supplied through the environment failed to parse.
    #[error("invalid filter regex '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
