//! Configuration schema definitions for tierpack.
//!
//! # Schema Overview
//!
//! ```text
//! Config (root)
//! ├── SchedulerConfig   - Worker budget and strategy
//! └── ReportConfig      - Output format and efficiency report
//! ```
//!
//! # Example
//!
//! ```toml
//! [scheduler]
//! max_workers = 4
//! strategy = "balanced"
//!
//! [report]
//! format = "text"
//! analyze = false
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::strategy::{Scheduler, Strategy};

/// Root configuration structure for tierpack.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Scheduling settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Builds a [`Scheduler`] from the scheduling settings.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.scheduler.max_workers).with_strategy(self.scheduler.strategy)
    }
}

/// Scheduling settings.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `max_workers` | 4 |
/// | `strategy` | `balanced` |
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Number of workers the consumer runs in parallel.
    ///
    /// Values below 1 are treated as 1.
    #[serde(default = "default_max_workers")]
    pub max_workers: i64,

    /// Grouping strategy.
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            strategy: Strategy::default(),
        }
    }
}

fn default_max_workers() -> i64 {
    4
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    /// How the plan is printed.
    #[serde(default)]
    pub format: OutputFormat,

    /// Append the efficiency report to the plan.
    #[serde(default)]
    pub analyze: bool,
}

/// Output format for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tiers and groups.
    #[default]
    Text,

    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    /// Name as written in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an output format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown output format '{0}'. Use: text, json")]
pub struct ParseFormatError(pub String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ParseFormatError(other.to_string())),
        }
    }
}
