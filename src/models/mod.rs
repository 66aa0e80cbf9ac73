pub mod cache;
pub mod config;
pub mod plan;
pub mod report;

pub use cache::CachedFolderRecord;
pub use config::{FileSemantics, MergeConfig, SourceSelection};
pub use plan::{MergePlan, PlannedAction, SkipReason};
pub use report::{MergeReport, MergeStats, RunOutcome};
