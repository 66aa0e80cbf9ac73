//! End-to-end merge scenarios: plan + execute over real trees

use std::fs;
use std::sync::atomic::Ordering;

use fusion::engine::{files_equal, plan, resolve_sources, Executor};
use fusion::models::{FileSemantics, MergeReport, PlannedAction, RunOutcome, SkipReason};
use tempfile::TempDir;

use super::helpers::*;

#[test]
fn multi_source_merge_into_empty_destination() {
    let temp = TempDir::new().unwrap();
    let src_a = temp.path().join("res 2");
    let src_b = temp.path().join("res 3");
    let dest = temp.path().join("res");
    build_tree(&src_a, &[("a.txt", "A"), ("sub/b.txt", "B")]);
    build_tree(&src_b, &[("c.txt", "C")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src_a.clone(), src_b.clone()]);
    let sources = resolve_sources(&cfg).unwrap();
    assert_eq!(sources.len(), 2);

    let executor = Executor::new();
    let mut total = MergeReport::empty();
    for source in &sources {
        let merge_plan = plan(source, &dest, &cfg).unwrap();
        total.absorb(executor.apply(&merge_plan, &cfg));
    }

    assert_eq!(total.stats.files_copied, 3);
    assert_eq!(total.stats.dirs_created, 1);
    assert_eq!(total.outcome, RunOutcome::Clean);
    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "A");
    assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "B");
    assert_eq!(fs::read_to_string(dest.join("c.txt")).unwrap(), "C");
}

#[test]
fn identical_and_conflicting_files_across_sources() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("same.txt", "X"), ("diff.txt", "new")]);
    build_tree(&dest, &[("same.txt", "X"), ("diff.txt", "old")]);

    let cfg = config_for(&dest, &[src.clone()]);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    let report = Executor::new().apply(&merge_plan, &cfg);

    assert_eq!(report.stats.files_skipped, 1);
    assert_eq!(report.stats.files_renamed, 1);
    assert_eq!(fs::read_to_string(dest.join("diff.txt")).unwrap(), "old");
    assert_eq!(fs::read_to_string(dest.join("diff (1).txt")).unwrap(), "new");
    // Conservation law over the whole run.
    assert_eq!(report.stats.files_visited(), 2);
}

#[test]
fn copied_bytes_match_source_bytes() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("bin.dat", "0123456789")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src.clone()]);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    let report = Executor::new().apply(&merge_plan, &cfg);

    assert_eq!(report.stats.bytes_copied, 10);
    assert!(files_equal(&src.join("bin.dat"), &dest.join("bin.dat")).unwrap());
}

#[test]
fn repeated_merge_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "A"), ("sub/b.txt", "B")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src.clone()]);
    let executor = Executor::new();

    let first = plan(&src, &dest, &cfg).unwrap();
    executor.apply(&first, &cfg);
    let after_first = snapshot(&dest);

    // Second run: everything is identical, so everything is skipped.
    let second = plan(&src, &dest, &cfg).unwrap();
    let report = executor.apply(&second, &cfg);

    assert_eq!(report.stats.files_copied, 0);
    assert_eq!(report.stats.files_skipped, 2);
    assert_eq!(snapshot(&dest), after_first);
}

#[test]
fn simulation_leaves_destination_untouched() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "A"), ("conflict.txt", "new")]);
    build_tree(&dest, &[("conflict.txt", "old")]);

    let before = snapshot(&dest);

    let mut cfg = config_for(&dest, &[src.clone()]);
    cfg.simulate = true;
    cfg.semantics = FileSemantics::Move;
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    let report = Executor::new().apply(&merge_plan, &cfg);

    assert_eq!(snapshot(&dest), before);
    assert_eq!(snapshot(&src).len(), 2);
    assert_eq!(report.stats.files_copied, 1);
    assert_eq!(report.stats.files_renamed, 1);
}

#[test]
fn move_semantics_drains_the_source_tree() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "A"), ("sub/b.txt", "B")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src.clone()]).with_semantics(FileSemantics::Move);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    let report = Executor::new().apply(&merge_plan, &cfg);

    assert_eq!(report.stats.files_copied, 2);
    assert!(!src.join("a.txt").exists());
    assert!(!src.join("sub/b.txt").exists());
    // The directory skeleton stays behind; only file content moves.
    assert!(src.join("sub").is_dir());
    assert_eq!(report.operations.len(), 2);
}

#[test]
fn conflict_resolution_scales_past_the_first_suffix() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "fourth")]);
    build_tree(
        &dest,
        &[
            ("a.txt", "first"),
            ("a (1).txt", "second"),
            ("a (2).txt", "third"),
        ],
    );

    let cfg = config_for(&dest, &[src.clone()]);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    match &merge_plan.actions[0] {
        PlannedAction::RenameAndCopy { dest: target, .. } => {
            assert_eq!(target, &dest.join("a (3).txt"));
        }
        other => panic!("expected rename, got {other:?}"),
    }

    Executor::new().apply(&merge_plan, &cfg);
    assert_eq!(fs::read_to_string(dest.join("a (3).txt")).unwrap(), "fourth");
}

#[test]
fn duplicate_under_suffixed_name_is_not_copied_again() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "second")]);
    build_tree(&dest, &[("a.txt", "first"), ("a (1).txt", "second")]);

    let cfg = config_for(&dest, &[src.clone()]);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    assert!(matches!(
        merge_plan.actions[0],
        PlannedAction::Skip {
            reason: SkipReason::DuplicateOf(_),
            ..
        }
    ));

    let report = Executor::new().apply(&merge_plan, &cfg);
    assert_eq!(report.stats.files_skipped, 1);
    assert_eq!(snapshot(&dest).len(), 2);
}

#[test]
fn cancellation_mid_run_reports_partial_progress() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "A"), ("b.txt", "B"), ("c.txt", "C")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src.clone()]);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();

    let executor = Executor::new();
    executor.cancel_flag().store(true, Ordering::SeqCst);
    let report = executor.apply(&merge_plan, &cfg);

    match report.outcome {
        RunOutcome::Cancelled { applied, planned } => {
            assert_eq!(applied, 0);
            assert_eq!(planned, 3);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
    assert!(snapshot(&dest).is_empty());
}

#[test]
fn hidden_files_stay_behind_unless_included() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[(".secret", "S"), ("open.txt", "O")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src.clone()]);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    Executor::new().apply(&merge_plan, &cfg);
    assert!(!dest.join(".secret").exists());
    assert!(dest.join("open.txt").exists());

    let mut with_hidden = config_for(&dest, &[src.clone()]);
    with_hidden.include_hidden = true;
    let merge_plan = plan(&src, &dest, &with_hidden).unwrap();
    Executor::new().apply(&merge_plan, &with_hidden);
    assert!(dest.join(".secret").exists());
}
