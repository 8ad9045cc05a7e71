//! Post-hoc statistics over a finished schedule.
//!
//! Nothing here feeds back into scheduling; the report exists for
//! diagnostics and tests.

use serde::Serialize;

use crate::schedule::Schedule;

/// Summary statistics for a [`Schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EfficiencyReport {
    pub total_groups: usize,
    pub total_tests: usize,

    /// Sum over tiers of the longest group in each tier, in milliseconds.
    /// Tiers run one after another, groups in a tier run side by side.
    pub estimated_total_time: f64,

    pub average_group_size: f64,

    /// `1 - stddev / mean` of group durations, floored at 0. 1.0 means
    /// every group takes the same time.
    pub load_balance: f64,

    /// Mean number of groups per tier.
    pub parallelism: f64,
}

/// Computes an [`EfficiencyReport`] for `schedule`.
///
/// # Example
///
/// ```
/// use tierpack::analyze::analyze;
/// use tierpack::strategy::{Strategy, group};
/// use tierpack::unit::WorkUnit;
///
/// let units = vec![
///     WorkUnit::new("a", "threads", "web").with_duration(100.0),
///     WorkUnit::new("b", "threads", "web").with_duration(60.0),
///     WorkUnit::new("c", "threads", "web").with_duration(40.0),
/// ];
/// let report = analyze(&group(&units, 2, Strategy::Balanced));
///
/// assert_eq!(report.total_groups, 2);
/// assert_eq!(report.estimated_total_time, 100.0);
/// assert_eq!(report.load_balance, 1.0);
/// ```
pub fn analyze<S>(schedule: &Schedule<S>) -> EfficiencyReport {
    let durations: Vec<f64> = schedule.groups().map(|g| g.estimated_duration).collect();
    let total_groups = durations.len();
    let total_tests = schedule.unit_count();

    let estimated_total_time = schedule.tiers.iter().map(|t| t.max_duration()).sum();

    let average_group_size = if total_groups == 0 {
        0.0
    } else {
        total_tests as f64 / total_groups as f64
    };

    let parallelism = if schedule.is_empty() {
        0.0
    } else {
        total_groups as f64 / schedule.len() as f64
    };

    EfficiencyReport {
        total_groups,
        total_tests,
        estimated_total_time,
        average_group_size,
        load_balance: load_balance(&durations),
        parallelism,
    }
}

/// One minus the coefficient of variation, clamped to `[0, 1]`.
///
/// Uses the population standard deviation. Returns 0 when the mean is 0.
pub fn load_balance(durations: &[f64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let n = durations.len() as f64;
    let mean = durations.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = durations.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / mean).max(0.0)
}
