//! Bin-assignment heuristics.
//!
//! Every packer takes the units of a single partition and a bin budget and
//! returns the bins in index order. Empty bins are dropped, so every bin
//! returned holds at least one unit.
//!
//! | Packer | Used by | Idea |
//! |--------|---------|------|
//! | [`lpt_pack`] | `balanced`, `dependency-aware` | longest first into the least loaded bin |
//! | [`round_robin_pack`] | `fast-fail` | unit `i` into bin `i mod k` |
//! | [`best_fit_pack`] | `resource-optimized` | minimize a time/memory/CPU score |
//!
//! [`color_by_dependencies`] is not a packer: it splits units into classes
//! with no shared dependency, and each class is then packed on its own.
//!
//! # Example
//!
//! ```
//! use tierpack::packing::{bin_count, lpt_pack};
//! use tierpack::unit::WorkUnit;
//!
//! let units = vec![
//!     WorkUnit::new("a", "threads", "web").with_duration(100.0),
//!     WorkUnit::new("b", "threads", "web").with_duration(10.0),
//!     WorkUnit::new("c", "threads", "web").with_duration(10.0),
//! ];
//! let refs: Vec<_> = units.iter().collect();
//!
//! let bins = lpt_pack(&refs, bin_count(2, refs.len()));
//! assert_eq!(bins.len(), 2);
//! assert_eq!(bins[0].len(), 1);
//! assert_eq!(bins[1].len(), 2);
//! ```

pub mod best_fit;
pub mod coloring;
pub mod lpt;
pub mod round_robin;

pub use best_fit::best_fit_pack;
pub use coloring::color_by_dependencies;
pub use lpt::lpt_pack;
pub use round_robin::round_robin_pack;

use crate::unit::WorkUnit;

/// Bins assigned to a partition, each a list of borrowed units.
pub type Bins<'a, S> = Vec<Vec<&'a WorkUnit<S>>>;

/// Number of bins for `unit_count` units under a worker budget:
/// `min(max_workers, unit_count)`, never below 1.
///
/// Non-positive budgets are clamped to 1 rather than rejected.
pub fn bin_count(max_workers: i64, unit_count: usize) -> usize {
    let workers = usize::try_from(max_workers.max(1)).unwrap_or(usize::MAX);
    workers.min(unit_count).max(1)
}

/// Allocates `num_bins` empty bins, treating 0 as 1.
pub(crate) fn empty_bins<'a, S>(num_bins: usize) -> Bins<'a, S> {
    (0..num_bins.max(1)).map(|_| Vec::new()).collect()
}
