//! Scheduler output: groups, tiers, and the schedule itself.
//!
//! ```text
//! Schedule
//! ├── Tier 0          (runs first; its groups run in parallel)
//! │   ├── Group       (one worker, units run in order)
//! │   └── Group
//! └── Tier 1          (starts once every group in tier 0 is done)
//!     └── Group
//! ```

use serde::Serialize;

use crate::partition::PartitionKey;
use crate::priority::group_priority;
use crate::unit::WorkUnit;

/// A set of units assigned to run together on one worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<S = String> {
    /// Spec handles in assignment order.
    pub units: Vec<S>,

    /// Sum of member durations in milliseconds.
    pub estimated_duration: f64,

    /// Lower runs earlier.
    pub priority: f64,

    pub pool_type: String,
    pub project_name: String,
    pub environment: String,
}

impl<S: Clone> Group<S> {
    /// Builds a group for units that all share `key`, computing its
    /// duration and priority from the members.
    pub fn from_units(key: &PartitionKey, units: &[&WorkUnit<S>]) -> Self {
        Self {
            units: units.iter().map(|u| u.spec_ref.clone()).collect(),
            estimated_duration: units.iter().fold(0.0, |acc, u| acc + u.duration_ms),
            priority: group_priority(units),
            pool_type: key.pool_type.clone(),
            project_name: key.project_name.clone(),
            environment: key.environment.clone(),
        }
    }
}

impl<S> Group<S> {
    /// Overrides the computed priority.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The partition every member of this group belongs to.
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey::new(
            self.pool_type.clone(),
            self.project_name.clone(),
            self.environment.clone(),
        )
    }
}

/// Groups that execute concurrently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tier<S = String> {
    pub groups: Vec<Group<S>>,
}

impl<S> Tier<S> {
    /// Wraps groups that may run at the same time.
    pub fn new(groups: Vec<Group<S>>) -> Self {
        Self { groups }
    }

    /// Priority of the most urgent group, or `f64::INFINITY` when empty.
    pub fn min_priority(&self) -> f64 {
        self.groups
            .iter()
            .map(|g| g.priority)
            .fold(f64::INFINITY, f64::min)
    }

    /// Wall-clock estimate for the tier: its longest group.
    pub fn max_duration(&self) -> f64 {
        self.groups
            .iter()
            .map(|g| g.estimated_duration)
            .fold(0.0, f64::max)
    }

    /// Number of units across all groups.
    pub fn unit_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Tiers in execution order. Tier `n + 1` must not start until every
/// group in tier `n` has finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule<S = String> {
    pub tiers: Vec<Tier<S>>,
}

impl<S> Schedule<S> {
    pub fn new(tiers: Vec<Tier<S>>) -> Self {
        Self { tiers }
    }

    /// A schedule with no tiers, as produced for empty input.
    pub fn empty() -> Self {
        Self { tiers: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Every group in execution order.
    pub fn groups(&self) -> impl Iterator<Item = &Group<S>> {
        self.tiers.iter().flat_map(|t| t.groups.iter())
    }

    /// Number of units across all tiers.
    pub fn unit_count(&self) -> usize {
        self.tiers.iter().map(Tier::unit_count).sum()
    }
}

impl<S> Default for Schedule<S> {
    fn default() -> Self {
        Self::empty()
    }
}
