//! Longest-processing-time-first greedy packing.
//!
//! Units are taken longest first and each goes into the bin with the
//! smallest accumulated load. The resulting makespan is within 4/3 of
//! optimal. The min-scan per unit is linear in the bin count, which is fine
//! for the hundreds of units and workers seen in practice.

use super::{Bins, empty_bins};
use crate::unit::WorkUnit;

/// Packs `units` into at most `num_bins` bins, balancing total duration.
///
/// Equal durations keep their input order, and equal loads go to the
/// lowest bin index.
pub fn lpt_pack<'a, S>(units: &[&'a WorkUnit<S>], num_bins: usize) -> Bins<'a, S> {
    if units.is_empty() {
        return Vec::new();
    }

    let mut sorted = units.to_vec();
    sorted.sort_by(|a, b| b.duration_ms.total_cmp(&a.duration_ms));

    let mut bins = empty_bins(num_bins);
    let mut loads = vec![0.0_f64; bins.len()];

    for unit in sorted {
        let idx = least_loaded(&loads);
        bins[idx].push(unit);
        loads[idx] += unit.duration_ms;
    }

    bins.retain(|b| !b.is_empty());
    bins
}

fn least_loaded(loads: &[f64]) -> usize {
    let mut best = 0;
    for (idx, load) in loads.iter().enumerate().skip(1) {
        if *load < loads[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(durations: &[f64]) -> Vec<WorkUnit<usize>> {
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| WorkUnit::new(i, "threads", "web").with_duration(*d))
            .collect()
    }

    fn ids(bin: &[&WorkUnit<usize>]) -> Vec<usize> {
        bin.iter().map(|u| u.spec_ref).collect()
    }

    fn load(bin: &[&WorkUnit<usize>]) -> f64 {
        bin.iter().map(|u| u.duration_ms).sum()
    }

    #[test]
    fn test_lpt_empty() {
        let bins = lpt_pack::<usize>(&[], 4);
        assert!(bins.is_empty());
    }

    #[test]
    fn test_lpt_zero_bins_clamped() {
        let all = units(&[5.0, 3.0]);
        let refs: Vec<_> = all.iter().collect();
        let bins = lpt_pack(&refs, 0);
        assert_eq!(bins.len(), 1);
        assert_eq!(ids(&bins[0]), vec![0, 1]);
    }

    #[test]
    fn test_lpt_largest_alone() {
        let all = units(&[100.0, 10.0, 10.0]);
        let refs: Vec<_> = all.iter().collect();
        let bins = lpt_pack(&refs, 2);

        assert_eq!(bins.len(), 2);
        assert_eq!(ids(&bins[0]), vec![0]);
        assert_eq!(ids(&bins[1]), vec![1, 2]);
        assert_eq!(load(&bins[0]), 100.0);
        assert_eq!(load(&bins[1]), 20.0);
    }

    #[test]
    fn test_lpt_sorts_longest_first() {
        let all = units(&[1.0, 9.0, 4.0, 6.0]);
        let refs: Vec<_> = all.iter().collect();
        let bins = lpt_pack(&refs, 2);

        // 9 -> b0, 6 -> b1, 4 -> b1 (6 < 9), 1 -> b0 (9 < 10)
        assert_eq!(ids(&bins[0]), vec![1, 0]);
        assert_eq!(ids(&bins[1]), vec![3, 2]);
    }

    #[test]
    fn test_lpt_ties_keep_input_order_and_lowest_bin() {
        let all = units(&[5.0, 5.0, 5.0, 5.0]);
        let refs: Vec<_> = all.iter().collect();
        let bins = lpt_pack(&refs, 3);

        assert_eq!(ids(&bins[0]), vec![0, 3]);
        assert_eq!(ids(&bins[1]), vec![1]);
        assert_eq!(ids(&bins[2]), vec![2]);
    }

    #[test]
    fn test_lpt_drops_empty_bins() {
        let all = units(&[0.0, 0.0, 0.0]);
        let refs: Vec<_> = all.iter().collect();
        let bins = lpt_pack(&refs, 3);

        // Zero-duration units never raise bin 0 above the others.
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].len(), 3);
    }

    #[test]
    fn test_lpt_worst_case_within_bound() {
        // Classic LPT worst case for 2 machines: optimal makespan is 6.
        let all = units(&[3.0, 3.0, 2.0, 2.0, 2.0]);
        let refs: Vec<_> = all.iter().collect();
        let bins = lpt_pack(&refs, 2);

        let makespan = bins.iter().map(|b| load(b)).fold(0.0, f64::max);
        assert_eq!(makespan, 7.0);
        assert!(makespan <= 6.0 * 4.0 / 3.0);
    }
}
