//! Run result accounting.
//!
//! [`RunSummary`] is a pure counter triple whose merge is associative and
//! commutative with an all-zero identity, so per-group, per-partition, and
//! whole-run results can be folded in any order. The failure ledger and timing
//! list ride alongside it in the final [`RunReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Aggregated total/failed/skipped counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl RunSummary {
    /// The merge identity.
    pub const fn empty() -> Self {
        Self {
            total: 0,
            failed: 0,
            skipped: 0,
        }
    }

    /// Summary for `count` units that ran and passed.
    pub const fn passed(count: u64) -> Self {
        Self {
            total: count,
            failed: 0,
            skipped: 0,
        }
    }

    /// Summary for `count` units reported skipped without running.
    pub const fn skipped(count: u64) -> Self {
        Self {
            total: count,
            failed: 0,
            skipped: count,
        }
    }

    /// Summary for `count` units reported failed without running.
    pub const fn failed(count: u64) -> Self {
        Self {
            total: count,
            failed: count,
            skipped: 0,
        }
    }

    pub const fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
        }
    }

    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl Add for RunSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.merge(rhs)
    }
}

impl AddAssign for RunSummary {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.merge(rhs);
    }
}

impl Sum for RunSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::empty(), Self::merge)
    }
}

/// One (partition, group) failure entry, appended when a group's execution
/// yields at least one failed unit or when a whole partition fails during
/// resource initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub partition: String,
    pub group: String,
}

impl FailureRecord {
    pub fn new(partition: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            group: group.into(),
        }
    }
}

/// Elapsed wall time for one resource-keyed partition, measured from the
/// start of initialization until the resource was disposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTiming {
    pub partition: String,
    pub elapsed: Duration,
}

/// Everything a run hands back to its caller: the folded summary, the failure
/// ledger, and per-partition timings in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub failed: Vec<FailureRecord>,
    pub timings: Vec<PartitionTiming>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
