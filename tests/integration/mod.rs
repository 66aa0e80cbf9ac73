//! Integration tests for the fusion merge engine
//!
//! These tests exercise the full pipeline over real temporary directory
//! trees: source resolution, planning, execution under both copy and move
//! semantics, empty-folder caching, and merge undo from a backup journal.

pub mod cache_flow;
pub mod helpers;
pub mod merge_flow;
