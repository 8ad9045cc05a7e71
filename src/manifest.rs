//! JSON manifest consumed by the CLI.
//!
//! A manifest bundles the raw units with the lookup tables the enricher
//! reads. Only `units` is required:
//!
//! ```json
//! {
//!   "units": [
//!     {"spec": "web/a", "pool": "threads", "project": "web", "module": "src/a.test.ts"}
//!   ],
//!   "results":      {"web:src/a.test.ts": {"duration_ms": 1200, "failed": false}},
//!   "file_stats":   {"web:src/a.test.ts": {"size_bytes": 4096}},
//!   "environments": {"web/a": {"name": "node", "options": {}}},
//!   "dependencies": {"web:src/a.test.ts": ["db", "redis"]}
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrich::{DependencyMap, Enricher, EnvironmentOverrides, FileStatsByKey, ResultsByKey};
use crate::unit::{RawUnit, WorkUnit};

/// Errors reading or decoding a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or doesn't match the schema.
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Units to schedule plus their history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub units: Vec<RawUnit<String>>,

    #[serde(default)]
    pub results: ResultsByKey,

    #[serde(default)]
    pub file_stats: FileStatsByKey,

    #[serde(default)]
    pub environments: EnvironmentOverrides<String>,

    #[serde(default)]
    pub dependencies: DependencyMap,
}

impl Manifest {
    /// Reads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json(&content)?;
        debug!(
            "Loaded {} units, {} results, {} file stats from {}",
            manifest.units.len(),
            manifest.results.len(),
            manifest.file_stats.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Enriches the manifest's units with its own lookup tables.
    pub fn work_units(&self) -> Vec<WorkUnit<String>> {
        Enricher::new(&self.results, &self.file_stats)
            .with_environments(&self.environments)
            .with_dependencies(&self.dependencies)
            .enrich(&self.units)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const SAMPLE: &str = r#"{
        "units": [
            {"spec": "web/a", "pool": "threads", "project": "web", "module": "a.test.ts",
             "environment": "jsdom", "test_count": 4},
            {"spec": "web/b", "pool": "threads", "project": "web", "module": "b.test.ts"}
        ],
        "results": {"web:a.test.ts": {"duration_ms": 1200, "failed": true}},
        "file_stats": {"web:b.test.ts": {"size_bytes": 4096}},
        "environments": {"web/b": {"name": "node", "options": {"isolate": true}}},
        "dependencies": {"web:a.test.ts": ["db"], "web:b.test.ts": ["db", "redis"]}
    }"#;

    #[test]
    fn test_minimal_manifest() {
        let manifest = Manifest::from_json(r#"{"units": []}"#).unwrap();
        assert!(manifest.units.is_empty());
        assert!(manifest.results.is_empty());
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_manifest_work_units() {
        let manifest = Manifest::from_json(SAMPLE).unwrap();
        let units = manifest.work_units();

        assert_eq!(units.len(), 2);
        assert!(units[0].failed);
        assert_eq!(units[0].duration_ms, 1200.0);
        assert_eq!(units[0].environment.as_deref(), Some("jsdom"));
        assert_eq!(units[0].test_count, Some(4));

        assert!(!units[1].failed);
        assert_eq!(units[1].duration_ms, 40.96);
        assert_eq!(units[1].environment.as_deref(), Some("node"));
        assert!(units[1].environment_options.contains_key("isolate"));
        assert!(units[0].conflicts_with(&units[1]));
    }

    #[test]
    fn test_manifest_missing_units_rejected() {
        let err = Manifest::from_json(r#"{"results": {}}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn test_manifest_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("units.json");
        fs::write(&path, SAMPLE).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.units.len(), 2);
    }

    #[test]
    fn test_manifest_load_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/units.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/units.json"));
    }
}
