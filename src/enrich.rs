//! Metadata enrichment.
//!
//! Attaches duration, failure, size, dependency, and environment metadata to
//! raw units using lookup tables the caller has already populated. Nothing
//! here performs I/O, and a missing entry never fails: it degrades to a
//! passing unit with a size-based duration estimate.
//!
//! # Lookup keys
//!
//! The results and file-stats tables are keyed by `"{project}:{module}"`
//! (see [`RawUnit::cache_key`]). Environment overrides are keyed by the
//! unit's spec handle.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::unit::{EnvironmentSpec, MIN_ESTIMATED_DURATION_MS, RawUnit, WorkUnit, non_negative};

/// Bytes of source assumed per millisecond of run time.
const BYTES_PER_MS: f64 = 100.0;

/// Outcome of the most recent observed run of a test file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriorResult {
    /// Wall-clock duration of the run, if it was recorded.
    #[serde(default)]
    pub duration_ms: Option<f64>,

    #[serde(default)]
    pub failed: bool,
}

impl PriorResult {
    /// A passing run that took `duration_ms`.
    pub fn passed(duration_ms: f64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            failed: false,
        }
    }

    /// A failing run that took `duration_ms`.
    pub fn failed(duration_ms: f64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            failed: true,
        }
    }
}

/// Size information for a test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileStats {
    pub size_bytes: u64,
}

/// Historical results keyed by `project:module`.
pub type ResultsByKey = HashMap<String, PriorResult>;

/// File sizes keyed by `project:module`.
pub type FileStatsByKey = HashMap<String, FileStats>;

/// Environment overrides keyed by spec handle.
pub type EnvironmentOverrides<S> = HashMap<S, EnvironmentSpec>;

/// Source of the dependency set for a test file.
///
/// The scheduler only ever compares these sets for overlap; how they are
/// computed (import graphs, fixture usage, tagged resources) is up to the
/// implementation.
pub trait DependencyProvider {
    /// Returns the resource or module identifiers the file touches.
    fn dependencies(&self, project_name: &str, module_id: &str) -> BTreeSet<String>;
}

/// Provider that knows nothing: every unit gets an empty dependency set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDependencies;

impl DependencyProvider for NoDependencies {
    fn dependencies(&self, _project_name: &str, _module_id: &str) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

/// Provider backed by a fixed table keyed by `project:module`.
///
/// # Example
///
/// ```
/// use tierpack::enrich::{DependencyMap, DependencyProvider};
///
/// let deps = DependencyMap::default().with("web:a.test.ts", ["db"]);
/// assert!(deps.dependencies("web", "a.test.ts").contains("db"));
/// assert!(deps.dependencies("web", "b.test.ts").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMap {
    entries: HashMap<String, BTreeSet<String>>,
}

impl DependencyMap {
    /// Wraps dependency sets already keyed by `project:module`.
    pub fn new(entries: HashMap<String, BTreeSet<String>>) -> Self {
        Self { entries }
    }

    /// Adds or replaces the dependency set for one cache key.
    pub fn with<I, D>(mut self, key: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.entries
            .insert(key.into(), dependencies.into_iter().map(Into::into).collect());
        self
    }

    /// Number of files with a recorded dependency set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DependencyProvider for DependencyMap {
    fn dependencies(&self, project_name: &str, module_id: &str) -> BTreeSet<String> {
        self.entries
            .get(&format!("{}:{}", project_name, module_id))
            .cloned()
            .unwrap_or_default()
    }
}

/// Duration guess for a file with no recorded run: linear in size with a
/// 10 ms floor.
pub fn estimate_duration_ms(file_size_bytes: u64) -> f64 {
    (file_size_bytes as f64 / BYTES_PER_MS).max(MIN_ESTIMATED_DURATION_MS)
}

/// Builds [`WorkUnit`]s from raw units and lookup tables.
///
/// # Example
///
/// ```
/// use tierpack::enrich::{Enricher, FileStats, FileStatsByKey, PriorResult, ResultsByKey};
/// use tierpack::unit::RawUnit;
///
/// let mut results = ResultsByKey::new();
/// results.insert("web:a.test.ts".into(), PriorResult::failed(1200.0));
/// let mut stats = FileStatsByKey::new();
/// stats.insert("web:b.test.ts".into(), FileStats { size_bytes: 5000 });
///
/// let raw = vec![
///     RawUnit::new("a", "threads", "web", "a.test.ts"),
///     RawUnit::new("b", "threads", "web", "b.test.ts"),
/// ];
/// let units = Enricher::new(&results, &stats).enrich(&raw);
///
/// assert!(units[0].failed);
/// assert_eq!(units[0].duration_ms, 1200.0);
/// assert_eq!(units[1].duration_ms, 50.0);
/// ```
pub struct Enricher<'a, S> {
    results: &'a ResultsByKey,
    file_stats: &'a FileStatsByKey,
    environments: Option<&'a EnvironmentOverrides<S>>,
    dependencies: &'a dyn DependencyProvider,
}

impl<'a, S> Enricher<'a, S>
where
    S: Clone + Eq + Hash,
{
    /// Creates an enricher with no environment overrides and no
    /// dependency information.
    pub fn new(results: &'a ResultsByKey, file_stats: &'a FileStatsByKey) -> Self {
        Self {
            results,
            file_stats,
            environments: None,
            dependencies: &NoDependencies,
        }
    }

    /// Applies per-unit environment overrides.
    pub fn with_environments(mut self, environments: &'a EnvironmentOverrides<S>) -> Self {
        self.environments = Some(environments);
        self
    }

    /// Uses the given provider for dependency sets.
    pub fn with_dependencies(mut self, dependencies: &'a dyn DependencyProvider) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Enriches every raw unit, preserving input order.
    pub fn enrich(&self, units: &[RawUnit<S>]) -> Vec<WorkUnit<S>> {
        units.iter().map(|raw| self.enrich_one(raw)).collect()
    }

    /// Enriches a single raw unit.
    pub fn enrich_one(&self, raw: &RawUnit<S>) -> WorkUnit<S> {
        let key = raw.cache_key();

        let file_size_bytes = self
            .file_stats
            .get(&key)
            .map(|s| s.size_bytes)
            .unwrap_or(0);

        let prior = self.results.get(&key);
        if prior.is_none() {
            debug!("No prior result for {}, estimating from size", key);
        }
        let failed = prior.is_some_and(|p| p.failed);
        let duration_ms = match prior.and_then(|p| p.duration_ms) {
            Some(d) => non_negative(d),
            None => estimate_duration_ms(file_size_bytes),
        };

        let (environment, environment_options) = match self
            .environments
            .and_then(|envs| envs.get(&raw.spec_ref))
        {
            Some(spec) => (Some(spec.name.clone()), spec.options.clone()),
            None => (raw.environment.clone(), serde_json::Map::new()),
        };

        WorkUnit {
            spec_ref: raw.spec_ref.clone(),
            pool_type: raw.pool_type.clone(),
            project_name: raw.project_name.clone(),
            environment,
            environment_options,
            duration_ms,
            file_size_bytes,
            failed,
            dependencies: self
                .dependencies
                .dependencies(&raw.project_name, &raw.module_id),
            test_count: raw.test_count,
        }
    }
}

/// Enriches raw units in one call.
///
/// Shorthand for [`Enricher`] with optional environment overrides and no
/// dependency information.
pub fn enrich<S>(
    units: &[RawUnit<S>],
    results: &ResultsByKey,
    file_stats: &FileStatsByKey,
    environments: Option<&EnvironmentOverrides<S>>,
) -> Vec<WorkUnit<S>>
where
    S: Clone + Eq + Hash,
{
    let mut enricher = Enricher::new(results, file_stats);
    if let Some(envs) = environments {
        enricher = enricher.with_environments(envs);
    }
    enricher.enrich(units)
}
