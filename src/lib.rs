//! tierpack: groups test files into ordered tiers of parallel batches.
//!
//! Given a flat list of test files and their history, tierpack decides
//! which files share a worker and in which order batches run, so that
//! wall-clock time stays low, known failures surface early, and files from
//! different pools, projects, or environments never share a worker.
//!
//! # Architecture
//!
//! ```text
//!  RawUnit ──► Enricher ──► WorkUnit ──► Scheduler::group ──► Schedule
//!                 ▲                          │                   │
//!          history tables             Partitioner +          analyze()
//!                                     Packing + Priority         ▼
//!                                                          EfficiencyReport
//! ```
//!
//! - [`enrich`]: attaches duration, failure, size, and dependency metadata
//! - [`partition`]: hard isolation by pool, project, and environment
//! - [`priority`]: urgency weights for units and groups
//! - [`packing`]: LPT, round-robin, graph coloring, best-fit
//! - [`strategy`]: the four strategies behind [`Scheduler::group`]
//! - [`analyze`]: post-hoc schedule statistics
//!
//! The engine is pure computation: no I/O, no shared state, and the same
//! input always produces the same schedule.
//!
//! # Example
//!
//! ```
//! use tierpack::enrich::{FileStatsByKey, PriorResult, ResultsByKey, enrich};
//! use tierpack::strategy::{Scheduler, Strategy};
//! use tierpack::unit::RawUnit;
//!
//! let raw = vec![
//!     RawUnit::new("a".to_string(), "threads", "web", "a.test.ts"),
//!     RawUnit::new("b".to_string(), "threads", "web", "b.test.ts"),
//! ];
//! let mut results = ResultsByKey::new();
//! results.insert("web:b.test.ts".into(), PriorResult::failed(800.0));
//!
//! let units = enrich(&raw, &results, &FileStatsByKey::new(), None);
//! let schedule = Scheduler::new(4).with_strategy(Strategy::FastFail).group(&units);
//!
//! assert_eq!(schedule.tiers[0].groups[0].units, vec!["b"]);
//! ```

pub mod analyze;
pub mod config;
pub mod enrich;
pub mod manifest;
pub mod packing;
pub mod partition;
pub mod priority;
pub mod report;
pub mod schedule;
pub mod strategy;
pub mod unit;

// Re-export commonly used types
pub use analyze::{EfficiencyReport, analyze};
pub use config::{Config, load_config};
pub use enrich::{DependencyProvider, Enricher};
pub use manifest::Manifest;
pub use partition::PartitionKey;
pub use schedule::{Group, Schedule, Tier};
pub use strategy::{Scheduler, Strategy, group};
pub use unit::{RawUnit, WorkUnit};
