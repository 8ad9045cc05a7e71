//! Round-robin distribution.
//!
//! No sorting and no durations: unit `i` goes to bin `i mod k`. Used where
//! getting work started matters more than balancing it.

use super::{Bins, empty_bins};
use crate::unit::WorkUnit;

/// Deals `units` across `num_bins` bins in input order.
pub fn round_robin_pack<'a, S>(units: &[&'a WorkUnit<S>], num_bins: usize) -> Bins<'a, S> {
    if units.is_empty() {
        return Vec::new();
    }

    let mut bins = empty_bins(num_bins);
    let count = bins.len();

    for (i, unit) in units.iter().enumerate() {
        bins[i % count].push(*unit);
    }

    // Remove empty batches
    bins.retain(|b| !b.is_empty());

    bins
}
