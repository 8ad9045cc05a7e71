//! Priority classification.
//!
//! Lower numbers run earlier. A unit's tier weight buckets it by urgency:
//!
//! | Condition | Weight |
//! |-----------|--------|
//! | failed on last run | 0 |
//! | duration > 5000 ms | 10 |
//! | duration > 1000 ms | 50 |
//! | otherwise | 100 |
//!
//! A group's priority is the duration-weighted mean of its members' weights,
//! so a group whose time is mostly spent on a failing test sorts ahead of an
//! all-fast group.

use std::cmp::Ordering;

use crate::unit::WorkUnit;

/// Weight of a unit that failed on its last run.
pub const FAILED_WEIGHT: f64 = 0.0;
/// Weight of a passing unit slower than 5 s.
pub const SLOW_WEIGHT: f64 = 10.0;
/// Weight of a passing unit slower than 1 s.
pub const MEDIUM_WEIGHT: f64 = 50.0;
/// Weight of every other unit, and of groups with no measured time.
pub const FAST_WEIGHT: f64 = 100.0;

const SLOW_THRESHOLD_MS: f64 = 5000.0;
const MEDIUM_THRESHOLD_MS: f64 = 1000.0;

/// Urgency bucket of a single unit.
pub fn tier_weight<S>(unit: &WorkUnit<S>) -> f64 {
    if unit.failed {
        FAILED_WEIGHT
    } else if unit.duration_ms > SLOW_THRESHOLD_MS {
        SLOW_WEIGHT
    } else if unit.duration_ms > MEDIUM_THRESHOLD_MS {
        MEDIUM_WEIGHT
    } else {
        FAST_WEIGHT
    }
}

/// Duration-weighted mean tier weight of a group.
///
/// Returns [`FAST_WEIGHT`] when the group has no measurable duration, and
/// the shared weight itself when every member has the same one, so groups of
/// equal urgency compare equal.
///
/// # Example
///
/// ```
/// use tierpack::priority::group_priority;
/// use tierpack::unit::WorkUnit;
///
/// let failing = WorkUnit::new("a", "threads", "web").with_duration(300.0).with_failed(true);
/// let fast = WorkUnit::new("b", "threads", "web").with_duration(100.0);
///
/// // 0 * 300 + 100 * 100 over 400 ms
/// assert_eq!(group_priority(&[&failing, &fast]), 25.0);
/// ```
pub fn group_priority<S>(units: &[&WorkUnit<S>]) -> f64 {
    let total: f64 = units.iter().map(|u| u.duration_ms).sum();
    if total <= 0.0 {
        return FAST_WEIGHT;
    }
    let first = tier_weight(units[0]);
    if units.iter().all(|u| tier_weight(*u) == first) {
        return first;
    }
    let weighted: f64 = units.iter().map(|u| tier_weight(*u) * u.duration_ms).sum();
    weighted / total
}

/// Ordering used to put the most urgent units first: failed before passing,
/// then longer before shorter, then larger files before smaller ones.
pub fn urgency_order<S>(a: &WorkUnit<S>, b: &WorkUnit<S>) -> Ordering {
    b.failed
        .cmp(&a.failed)
        .then_with(|| b.duration_ms.total_cmp(&a.duration_ms))
        .then_with(|| b.file_size_bytes.cmp(&a.file_size_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(duration: f64, failed: bool) -> WorkUnit<&'static str> {
        WorkUnit::new("u", "threads", "web")
            .with_duration(duration)
            .with_failed(failed)
    }

    #[test]
    fn test_tier_weight_buckets() {
        assert_eq!(tier_weight(&unit(10_000.0, true)), 0.0);
        assert_eq!(tier_weight(&unit(10.0, true)), 0.0);
        assert_eq!(tier_weight(&unit(5001.0, false)), 10.0);
        assert_eq!(tier_weight(&unit(5000.0, false)), 50.0);
        assert_eq!(tier_weight(&unit(1001.0, false)), 50.0);
        assert_eq!(tier_weight(&unit(1000.0, false)), 100.0);
        assert_eq!(tier_weight(&unit(0.0, false)), 100.0);
    }

    #[test]
    fn test_group_priority_weighted() {
        let slow = unit(6000.0, false);
        let medium = unit(2000.0, false);
        // (10 * 6000 + 50 * 2000) / 8000
        assert_eq!(group_priority(&[&slow, &medium]), 20.0);
    }

    #[test]
    fn test_group_priority_zero_duration() {
        let a = unit(0.0, true);
        let b = unit(0.0, false);
        assert_eq!(group_priority(&[&a, &b]), 100.0);
        assert_eq!(group_priority::<&str>(&[]), 100.0);
    }

    #[test]
    fn test_group_priority_uniform_weight_is_exact() {
        // 0.1 + 0.2 does not sum exactly, the weighted mean would drift
        let a = unit(0.1, false);
        let b = unit(0.2, false);
        assert_eq!(group_priority(&[&a, &b]), 100.0);

        let c = unit(1500.0, false);
        let d = unit(1100.7, false);
        assert_eq!(group_priority(&[&c, &d]), 50.0);

        let e = unit(0.3, true);
        let f = unit(0.7, true);
        assert_eq!(group_priority(&[&e, &f]), 0.0);
    }

    #[test]
    fn test_failed_long_test_pulls_group_forward() {
        let failing = unit(900.0, true);
        let fast: Vec<_> = (0..3).map(|_| unit(100.0, false)).collect();
        let mut mixed = vec![&failing];
        mixed.extend(fast.iter());

        let all_fast: Vec<_> = fast.iter().collect();
        assert!(group_priority(&mixed) < group_priority(&all_fast));
    }

    #[test]
    fn test_urgency_order() {
        let mut units = [
            unit(100.0, false).with_file_size(10),
            unit(100.0, false).with_file_size(500),
            unit(5.0, true),
            unit(900.0, false),
        ];
        units.sort_by(urgency_order);

        assert!(units[0].failed);
        assert_eq!(units[1].duration_ms, 900.0);
        assert_eq!(units[2].file_size_bytes, 500);
        assert_eq!(units[3].file_size_bytes, 10);
    }
}
