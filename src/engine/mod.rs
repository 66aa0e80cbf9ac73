//! The merge engine: source resolution, content comparison, conflict naming,
//! planning and execution.
//!
//! The pipeline is strictly sequential: `sources::resolve_sources` turns the
//! configuration into concrete roots, `planner::plan` produces an ordered
//! action sequence per root without touching the filesystem, and
//! `executor::Executor::apply` performs (or simulates) the mutations and
//! accounts for every file visited.

pub mod compare;
pub mod executor;
pub mod naming;
pub mod planner;
pub mod sources;

pub use compare::files_equal;
pub use executor::Executor;
pub use planner::plan;
pub use sources::resolve_sources;

/// Platform notion of "hidden" used by the planner: dot-prefixed names.
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
