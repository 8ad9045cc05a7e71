//! Greedy graph coloring over shared dependencies.
//!
//! Two units conflict when their dependency sets intersect. Coloring the
//! conflict graph splits the units into classes with no internal conflict.
//! Each class is packed separately afterwards, so the guarantee is that
//! conflicting units never land in the same class, not that a packed bin
//! is conflict free.

use std::collections::BTreeSet;

use super::Bins;
use crate::unit::WorkUnit;

/// Adjacency lists of the conflict graph, indexed like `units`.
///
/// Neighbor lists are sorted ascending and a unit is never its own
/// neighbor.
pub fn conflict_graph<S>(units: &[&WorkUnit<S>]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); units.len()];
    for i in 0..units.len() {
        for j in (i + 1)..units.len() {
            if units[i].conflicts_with(units[j]) {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
    }
    adjacency
}

/// Assigns each vertex the smallest color not used by an already colored
/// neighbor, visiting vertices in index order.
pub fn greedy_coloring(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let mut colors: Vec<Option<usize>> = vec![None; adjacency.len()];

    for vertex in 0..adjacency.len() {
        let taken: BTreeSet<usize> = adjacency[vertex]
            .iter()
            .filter_map(|&n| colors[n])
            .collect();
        let color = (0..).find(|c| !taken.contains(c)).unwrap_or(0);
        colors[vertex] = Some(color);
    }

    colors.into_iter().map(|c| c.unwrap_or(0)).collect()
}

/// Splits `units` into color classes, ordered by color. Units keep their
/// input order inside a class.
///
/// # Example
///
/// ```
/// use tierpack::packing::color_by_dependencies;
/// use tierpack::unit::WorkUnit;
///
/// let units = vec![
///     WorkUnit::new("a", "threads", "web").with_dependencies(["db"]),
///     WorkUnit::new("b", "threads", "web").with_dependencies(["db"]),
///     WorkUnit::new("c", "threads", "web"),
/// ];
/// let refs: Vec<_> = units.iter().collect();
/// let classes = color_by_dependencies(&refs);
///
/// assert_eq!(classes.len(), 2);
/// assert_eq!(classes[0].len(), 2); // a, c
/// assert_eq!(classes[1].len(), 1); // b
/// ```
pub fn color_by_dependencies<'a, S>(units: &[&'a WorkUnit<S>]) -> Bins<'a, S> {
    if units.is_empty() {
        return Vec::new();
    }

    let colors = greedy_coloring(&conflict_graph(units));
    let class_count = colors.iter().max().map_or(0, |c| c + 1);

    let mut classes: Bins<'a, S> = (0..class_count).map(|_| Vec::new()).collect();
    for (unit, color) in units.iter().zip(colors) {
        classes[color].push(*unit);
    }
    classes
}
