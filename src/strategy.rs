//! Strategy engine.
//!
//! Combines partitioning, one packing algorithm, and priority classification
//! into an ordered [`Schedule`]. The strategy is picked per call and never
//! changes during it.
//!
//! | Strategy | Packing | Tiers |
//! |----------|---------|-------|
//! | `balanced` | LPT per partition | one per partition, most urgent first |
//! | `fast-fail` | round-robin for failed units, then `balanced` | failed tier first |
//! | `dependency-aware` | coloring, then LPT per partition | one per color class |
//! | `resource-optimized` | best-fit per partition | one per partition, most urgent first |
//!
//! # Example
//!
//! ```
//! use tierpack::strategy::{Scheduler, Strategy};
//! use tierpack::unit::WorkUnit;
//!
//! let units = vec![
//!     WorkUnit::new("a", "threads", "web").with_duration(100.0),
//!     WorkUnit::new("b", "threads", "web").with_duration(10.0),
//!     WorkUnit::new("c", "threads", "web").with_duration(10.0).with_failed(true),
//! ];
//!
//! let schedule = Scheduler::new(2)
//!     .with_strategy(Strategy::FastFail)
//!     .group(&units);
//!
//! assert_eq!(schedule.tiers[0].groups[0].units, vec!["c"]);
//! assert_eq!(schedule.tiers[0].groups[0].priority, 0.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::packing::{
    Bins, best_fit_pack, bin_count, color_by_dependencies, lpt_pack, round_robin_pack,
};
use crate::partition::{PartitionKey, group_by_partition};
use crate::priority::{FAILED_WEIGHT, urgency_order};
use crate::schedule::{Group, Schedule, Tier};
use crate::unit::WorkUnit;

/// How units are packed and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Minimize wall-clock time with LPT packing per partition.
    #[default]
    Balanced,

    /// Run units that failed last time first, then everything else balanced.
    FastFail,

    /// Never run units sharing a dependency at the same time.
    DependencyAware,

    /// Balance estimated time, memory, and CPU per worker.
    ResourceOptimized,
}

impl Strategy {
    /// Every strategy, in the order they are listed to users.
    pub const ALL: [Strategy; 4] = [
        Strategy::Balanced,
        Strategy::FastFail,
        Strategy::DependencyAware,
        Strategy::ResourceOptimized,
    ];

    /// Kebab-case name, as accepted by [`FromStr`] and written to config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::FastFail => "fast-fail",
            Strategy::DependencyAware => "dependency-aware",
            Strategy::ResourceOptimized => "resource-optimized",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a strategy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Unknown strategy '{0}'. Use: balanced, fast-fail, dependency-aware, resource-optimized"
)]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

/// Groups work units into tiers for a fixed worker budget.
///
/// The scheduler is pure: it performs no I/O, keeps no state between
/// calls, and returns the same schedule for the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    max_workers: i64,
    strategy: Strategy,
}

impl Scheduler {
    /// Creates a `balanced` scheduler. Budgets below 1 are clamped to 1.
    pub fn new(max_workers: i64) -> Self {
        Self {
            max_workers: max_workers.max(1),
            strategy: Strategy::default(),
        }
    }

    /// Selects the strategy used by [`Scheduler::group`].
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The worker budget after clamping, always at least 1.
    pub fn max_workers(&self) -> i64 {
        self.max_workers
    }

    /// The selected strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Partitions, packs, and orders `units` into a schedule.
    ///
    /// Every unit appears in exactly one group, and no group mixes pool
    /// types, projects, or environments. Empty input gives an empty
    /// schedule.
    pub fn group<S: Clone>(&self, units: &[WorkUnit<S>]) -> Schedule<S> {
        if units.is_empty() {
            return Schedule::empty();
        }

        let refs: Vec<&WorkUnit<S>> = units.iter().collect();
        let tiers = match self.strategy {
            Strategy::Balanced => self.balanced(&refs),
            Strategy::FastFail => self.fast_fail(&refs),
            Strategy::DependencyAware => self.dependency_aware(&refs),
            Strategy::ResourceOptimized => self.resource_optimized(&refs),
        };
        let schedule = Schedule::new(tiers);

        info!(
            "Grouped {} units into {} tiers ({} groups) using {}",
            units.len(),
            schedule.len(),
            schedule.groups().count(),
            self.strategy
        );

        schedule
    }

    fn balanced<S: Clone>(&self, units: &[&WorkUnit<S>]) -> Vec<Tier<S>> {
        let mut sorted = units.to_vec();
        sorted.sort_by(|a, b| urgency_order(*a, *b));

        let mut tiers: Vec<Tier<S>> = group_by_partition(&sorted)
            .iter()
            .map(|(key, members)| Tier::new(self.pack_partition(key, members, lpt_pack)))
            .collect();
        sort_by_urgency(&mut tiers);
        tiers
    }

    fn fast_fail<S: Clone>(&self, units: &[&WorkUnit<S>]) -> Vec<Tier<S>> {
        let (failed, passed): (Vec<&WorkUnit<S>>, Vec<&WorkUnit<S>>) =
            units.iter().copied().partition(|u| u.failed);

        let mut tiers = Vec::new();
        if !failed.is_empty() {
            debug!("{} units failed on their last run", failed.len());
            let groups = group_by_partition(&failed)
                .iter()
                .flat_map(|(key, members)| self.pack_partition(key, members, round_robin_pack))
                .map(|group| group.with_priority(FAILED_WEIGHT))
                .collect();
            tiers.push(Tier::new(groups));
        }
        if !passed.is_empty() {
            tiers.extend(self.balanced(&passed));
        }
        tiers
    }

    fn dependency_aware<S: Clone>(&self, units: &[&WorkUnit<S>]) -> Vec<Tier<S>> {
        let classes = color_by_dependencies(units);
        debug!(
            "Dependency coloring split {} units into {} classes",
            units.len(),
            classes.len()
        );

        classes
            .iter()
            .map(|class| {
                let groups = group_by_partition(class)
                    .iter()
                    .flat_map(|(key, members)| self.pack_partition(key, members, lpt_pack))
                    .collect();
                Tier::new(groups)
            })
            .collect()
    }

    fn resource_optimized<S: Clone>(&self, units: &[&WorkUnit<S>]) -> Vec<Tier<S>> {
        let mut tiers: Vec<Tier<S>> = group_by_partition(units)
            .iter()
            .map(|(key, members)| Tier::new(self.pack_partition(key, members, best_fit_pack)))
            .collect();
        sort_by_urgency(&mut tiers);
        tiers
    }

    /// Packs the units of one partition into at most
    /// `min(max_workers, members.len())` groups.
    fn pack_partition<'a, S, F>(
        &self,
        key: &PartitionKey,
        members: &[&'a WorkUnit<S>],
        packer: F,
    ) -> Vec<Group<S>>
    where
        S: Clone,
        F: Fn(&[&'a WorkUnit<S>], usize) -> Bins<'a, S>,
    {
        let bins = packer(members, bin_count(self.max_workers, members.len()));
        debug!(
            "Packed {} units of {} into {} groups",
            members.len(),
            key,
            bins.len()
        );
        bins.iter().map(|bin| Group::from_units(key, bin)).collect()
    }
}

/// Orders tiers by their most urgent group. Equal tiers keep their order.
fn sort_by_urgency<S>(tiers: &mut [Tier<S>]) {
    tiers.sort_by(|a, b| a.min_priority().total_cmp(&b.min_priority()));
}

/// Groups `units` with the given worker budget and strategy.
///
/// Shorthand for `Scheduler::new(max_workers).with_strategy(strategy).group(units)`.
///
/// # Arguments
///
/// * `units` - Enriched units to schedule
/// * `max_workers` - Groups allowed per partition; values below 1 mean 1
/// * `strategy` - How units are packed and tiers ordered
///
/// # Example
///
/// ```
/// use tierpack::strategy::{Strategy, group};
/// use tierpack::unit::WorkUnit;
///
/// let units = vec![
///     WorkUnit::new("a", "threads", "web").with_duration(300.0),
///     WorkUnit::new("b", "threads", "web").with_duration(200.0),
///     WorkUnit::new("c", "threads", "web").with_duration(100.0),
/// ];
/// let schedule = group(&units, 2, Strategy::Balanced);
///
/// assert_eq!(schedule.tiers[0].groups[0].units, vec!["a"]);
/// assert_eq!(schedule.tiers[0].groups[1].units, vec!["b", "c"]);
/// ```
pub fn group<S: Clone>(units: &[WorkUnit<S>], max_workers: i64, strategy: Strategy) -> Schedule<S> {
    Scheduler::new(max_workers)
        .with_strategy(strategy)
        .group(units)
}
