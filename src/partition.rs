//! Hard isolation boundaries between work units.
//!
//! Units from different pools, projects, or environments may carry
//! incompatible global state, so they must never share a worker. Every
//! packing algorithm is run once per bucket produced here and never across
//! buckets.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::unit::WorkUnit;

/// `(pool type, project, environment)` with the environment already
/// normalized to `"default"` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PartitionKey {
    pub pool_type: String,
    pub project_name: String,
    pub environment: String,
}

impl PartitionKey {
    /// Builds a key from its three components, used as given.
    pub fn new(
        pool_type: impl Into<String>,
        project_name: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            pool_type: pool_type.into(),
            project_name: project_name.into(),
            environment: environment.into(),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.pool_type, self.project_name, self.environment
        )
    }
}

/// Buckets units by partition key.
///
/// Buckets appear in order of the first unit seen for each key, and units
/// keep their relative input order inside a bucket, so the result depends
/// only on the input order.
///
/// # Example
///
/// ```
/// use tierpack::partition::group_by_partition;
/// use tierpack::unit::WorkUnit;
///
/// let units = vec![
///     WorkUnit::new("a", "threads", "web"),
///     WorkUnit::new("b", "forks", "web"),
///     WorkUnit::new("c", "threads", "web"),
/// ];
/// let refs: Vec<_> = units.iter().collect();
/// let buckets = group_by_partition(&refs);
///
/// assert_eq!(buckets.len(), 2);
/// assert_eq!(buckets[0].len(), 2);
/// ```
pub fn group_by_partition<'a, S>(
    units: &[&'a WorkUnit<S>],
) -> IndexMap<PartitionKey, Vec<&'a WorkUnit<S>>> {
    let mut buckets: IndexMap<PartitionKey, Vec<&'a WorkUnit<S>>> = IndexMap::new();
    for unit in units {
        buckets.entry(unit.partition_key()).or_default().push(*unit);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_empty() {
        let buckets = group_by_partition::<String>(&[]);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_partition_preserves_order() {
        let units = vec![
            WorkUnit::new("a", "threads", "web"),
            WorkUnit::new("b", "threads", "api"),
            WorkUnit::new("c", "threads", "web"),
            WorkUnit::new("d", "threads", "api"),
            WorkUnit::new("e", "threads", "web"),
        ];
        let refs: Vec<_> = units.iter().collect();
        let buckets = group_by_partition(&refs);

        let keys: Vec<_> = buckets.keys().map(|k| k.project_name.as_str()).collect();
        assert_eq!(keys, vec!["web", "api"]);

        let web: Vec<_> = buckets[0].iter().map(|u| u.spec_ref).collect();
        assert_eq!(web, vec!["a", "c", "e"]);
        let api: Vec<_> = buckets[1].iter().map(|u| u.spec_ref).collect();
        assert_eq!(api, vec!["b", "d"]);
    }

    #[test]
    fn test_missing_environment_matches_default() {
        let units = vec![
            WorkUnit::new("a", "threads", "web"),
            WorkUnit::new("b", "threads", "web").with_environment("default"),
            WorkUnit::new("c", "threads", "web").with_environment("jsdom"),
        ];
        let refs: Vec<_> = units.iter().collect();
        let buckets = group_by_partition(&refs);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].len(), 2);
        assert_eq!(buckets[1][0].spec_ref, "c");
    }

    #[test]
    fn test_delimiter_in_names_is_not_ambiguous() {
        // Same concatenation "a::b::c" either way; keys must still differ.
        let units = vec![
            WorkUnit::new("x", "a::b", "c"),
            WorkUnit::new("y", "a", "b::c"),
        ];
        let refs: Vec<_> = units.iter().collect();
        let buckets = group_by_partition(&refs);
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_key_display() {
        let key = PartitionKey::new("threads", "web", "node");
        assert_eq!(key.to_string(), "threads/web/node");
    }
}
