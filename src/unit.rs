//! Work unit data model.
//!
//! A [`RawUnit`] is what a caller knows about a test file before any
//! history is consulted: an opaque spec handle plus the keys that decide
//! which worker pool it may run in. The [`Enricher`](crate::enrich::Enricher)
//! turns raw units into [`WorkUnit`]s carrying the duration, failure, size
//! and dependency metadata the packing algorithms work from.
//!
//! The spec handle type `S` is never inspected by the scheduler. It only
//! has to be cloneable so it can be copied into the output groups.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::partition::PartitionKey;

/// Environment name used when a unit has none.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Duration assumed for a unit with no history and no size information.
pub const MIN_ESTIMATED_DURATION_MS: f64 = 10.0;

/// A schedulable test file as supplied by the caller.
///
/// # Example
///
/// ```
/// use tierpack::unit::RawUnit;
///
/// let raw = RawUnit::new("web/a", "threads", "web", "src/a.test.ts")
///     .with_environment("jsdom");
/// assert_eq!(raw.cache_key(), "web:src/a.test.ts");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUnit<S = String> {
    /// Opaque handle carried through to the output groups.
    #[serde(rename = "spec")]
    pub spec_ref: S,

    /// Execution pool / runtime class.
    #[serde(rename = "pool")]
    pub pool_type: String,

    /// Logical project or workspace.
    #[serde(rename = "project")]
    pub project_name: String,

    /// Path of the test file relative to its project root.
    #[serde(rename = "module")]
    pub module_id: String,

    /// Logical execution environment, if the caller knows it.
    #[serde(default)]
    pub environment: Option<String>,

    /// Number of tests in the file. Informational only.
    #[serde(default)]
    pub test_count: Option<usize>,
}

impl<S> RawUnit<S> {
    /// Creates a raw unit with no environment and no test count.
    pub fn new(
        spec_ref: S,
        pool_type: impl Into<String>,
        project_name: impl Into<String>,
        module_id: impl Into<String>,
    ) -> Self {
        Self {
            spec_ref,
            pool_type: pool_type.into(),
            project_name: project_name.into(),
            module_id: module_id.into(),
            environment: None,
            test_count: None,
        }
    }

    /// Sets the execution environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Sets the informational test count.
    pub fn with_test_count(mut self, test_count: usize) -> Self {
        self.test_count = Some(test_count);
        self
    }

    /// Key used to look this unit up in the history tables: `project:module`.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.project_name, self.module_id)
    }
}

/// Per-unit environment override, looked up by spec handle.
///
/// Only `name` influences scheduling. `options` are passed through to the
/// consumer of the schedule untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub name: String,

    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl EnvironmentSpec {
    /// An override that only renames the environment, with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: serde_json::Map::new(),
        }
    }
}

/// A test file with all the metadata the scheduler needs.
///
/// Work units are built fresh for every scheduling call and never mutated
/// afterwards.
///
/// # Example
///
/// ```
/// use tierpack::unit::WorkUnit;
///
/// let unit = WorkUnit::new("a", "forks", "api")
///     .with_duration(1500.0)
///     .with_failed(true);
/// assert_eq!(unit.partition_key().environment, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkUnit<S = String> {
    pub spec_ref: S,
    pub pool_type: String,
    pub project_name: String,
    pub environment: Option<String>,

    /// Options from an environment override, if one applied.
    pub environment_options: serde_json::Map<String, serde_json::Value>,

    /// Historical duration, or a size-based estimate when there is none.
    pub duration_ms: f64,

    pub file_size_bytes: u64,

    /// Whether the most recent observed run failed.
    pub failed: bool,

    /// Resource or module identifiers this unit touches.
    pub dependencies: BTreeSet<String>,

    pub test_count: Option<usize>,
}

impl<S> WorkUnit<S> {
    /// Creates a unit with default metadata: 10 ms, passing, no dependencies.
    pub fn new(spec_ref: S, pool_type: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            spec_ref,
            pool_type: pool_type.into(),
            project_name: project_name.into(),
            environment: None,
            environment_options: serde_json::Map::new(),
            duration_ms: MIN_ESTIMATED_DURATION_MS,
            file_size_bytes: 0,
            failed: false,
            dependencies: BTreeSet::new(),
            test_count: None,
        }
    }

    /// Sets the execution environment. Unset means `"default"`.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Negative or NaN durations are stored as zero.
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = non_negative(duration_ms);
        self
    }

    /// Sets the source file size used for estimates and memory footprint.
    pub fn with_file_size(mut self, file_size_bytes: u64) -> Self {
        self.file_size_bytes = file_size_bytes;
        self
    }

    /// Marks whether the last observed run failed.
    pub fn with_failed(mut self, failed: bool) -> Self {
        self.failed = failed;
        self
    }

    /// Replaces the dependency set. Duplicates collapse.
    pub fn with_dependencies<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Environment name with the `"default"` sentinel applied.
    pub fn environment_name(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// The isolation key this unit must share with every group-mate.
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey::new(
            self.pool_type.clone(),
            self.project_name.clone(),
            self.environment_name().to_string(),
        )
    }

    /// Returns true if the two units touch at least one common dependency.
    pub fn conflicts_with(&self, other: &WorkUnit<S>) -> bool {
        !self.dependencies.is_disjoint(&other.dependencies)
    }
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 { 0.0 } else { value }
}
