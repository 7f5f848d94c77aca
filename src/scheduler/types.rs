//! Core scheduling data model.
//!
//! Work units and execution groups are opaque to the scheduler: it never
//! inspects a unit's content, only its identity, label, and pre-assigned skip
//! reason. The resource key a group depends on is derived once at discovery
//! time and carried here as plain data, so the core needs no runtime type
//! introspection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the shared resource an execution group depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest schedulable item, one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    /// Stable identity, unique within a run.
    pub id: String,
    /// Display label used in reporting.
    pub label: String,
    /// Pre-assigned skip reason; `None` means not skipped.
    pub skip_reason: Option<String>,
}

impl WorkUnit {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            skip_reason: None,
        }
    }

    pub fn with_skip_reason(mut self, reason: impl Into<String>) -> Self {
        self.skip_reason = Some(reason.into());
        self
    }

    /// A unit counts as pre-skipped only when the reason is non-blank.
    pub fn is_skipped(&self) -> bool {
        self.skip_reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }
}

/// Ordered, non-empty set of work units sharing one ambient context
/// (one test class/collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionGroup {
    /// Display label used for filter matching and failure reporting.
    pub label: String,
    pub units: Vec<WorkUnit>,
    /// Declared shared-resource dependency, attached at discovery time.
    pub resource_key: Option<ResourceKey>,
}

impl ExecutionGroup {
    pub fn new(label: impl Into<String>, units: Vec<WorkUnit>) -> Self {
        debug_assert!(!units.is_empty(), "execution groups are non-empty");
        Self {
            label: label.into(),
            units,
            resource_key: None,
        }
    }

    pub fn with_resource(mut self, key: ResourceKey) -> Self {
        self.resource_key = Some(key);
        self
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn all_units_skipped(&self) -> bool {
        self.units.iter().all(WorkUnit::is_skipped)
    }
}

/// All execution groups sharing one resource key. Exactly one partition exists
/// per distinct key observed, plus at most one for `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: Option<ResourceKey>,
    pub groups: Vec<ExecutionGroup>,
}

impl Partition {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn unit_count(&self) -> usize {
        self.groups.iter().map(ExecutionGroup::unit_count).sum()
    }

    pub fn all_units_skipped(&self) -> bool {
        self.groups.iter().all(ExecutionGroup::all_units_skipped)
    }

    /// One representative group label, used in configuration fault messages.
    pub fn representative_label(&self) -> &str {
        self.groups.first().map_or("", |g| g.label.as_str())
    }
}
