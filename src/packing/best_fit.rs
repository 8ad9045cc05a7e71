//! Multi-dimensional best-fit packing over time, memory, and CPU.
//!
//! Each unit gets a rough footprint: memory is ten times its file size and
//! CPU is its duration over 100. Bins track total time, peak memory (max,
//! since members run one after another), and total CPU. A unit goes to the
//! bin whose score after insertion is lowest, first bin winning ties.

use super::{Bins, empty_bins};
use crate::unit::WorkUnit;

const MEMORY_PER_BYTE: f64 = 10.0;
const CPU_PER_MS: f64 = 0.01;

const TIME_WEIGHT: f64 = 1.0;
const MEMORY_WEIGHT: f64 = 0.5;
const CPU_WEIGHT: f64 = 0.3;

/// Estimated resource footprint of one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub time: f64,
    pub memory: f64,
    pub cpu: f64,
}

impl Footprint {
    /// Estimates the footprint from duration and file size.
    pub fn of<S>(unit: &WorkUnit<S>) -> Self {
        Self {
            time: unit.duration_ms,
            memory: unit.file_size_bytes as f64 * MEMORY_PER_BYTE,
            cpu: unit.duration_ms * CPU_PER_MS,
        }
    }

    /// Combined size used to order units, largest first.
    pub fn volume(&self) -> f64 {
        self.time * self.memory * self.cpu
    }
}

/// Running totals for one bin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct BinLoad {
    time: f64,
    memory: f64,
    cpu: f64,
}

impl BinLoad {
    fn with(&self, fp: &Footprint) -> Self {
        Self {
            time: self.time + fp.time,
            memory: self.memory.max(fp.memory),
            cpu: self.cpu + fp.cpu,
        }
    }

    fn score(&self) -> f64 {
        self.time * TIME_WEIGHT + self.memory * MEMORY_WEIGHT + self.cpu * CPU_WEIGHT
    }
}

/// Packs `units` into at most `num_bins` bins by best post-insertion score.
pub fn best_fit_pack<'a, S>(units: &[&'a WorkUnit<S>], num_bins: usize) -> Bins<'a, S> {
    if units.is_empty() {
        return Vec::new();
    }

    let mut sized: Vec<(&'a WorkUnit<S>, Footprint)> =
        units.iter().map(|u| (*u, Footprint::of(*u))).collect();
    sized.sort_by(|(_, a), (_, b)| b.volume().total_cmp(&a.volume()));

    let mut bins = empty_bins(num_bins);
    let mut loads = vec![BinLoad::default(); bins.len()];

    for (unit, fp) in sized {
        let mut best = 0;
        let mut best_score = f64::INFINITY;
        for (idx, load) in loads.iter().enumerate() {
            let score = load.with(&fp).score();
            if score < best_score {
                best = idx;
                best_score = score;
            }
        }
        bins[best].push(unit);
        loads[best] = loads[best].with(&fp);
    }

    bins.retain(|b| !b.is_empty());
    bins
}
