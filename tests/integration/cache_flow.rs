//! Drained-source caching and merge undo flows

use std::fs;

use fusion::backup::{read_backup, BackupJournal};
use fusion::cache::{is_drained, FolderCache};
use fusion::engine::{plan, Executor};
use fusion::error::FusionError;
use fusion::models::FileSemantics;
use tempfile::TempDir;

use super::helpers::*;

#[test]
fn drained_source_round_trips_through_the_cache() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("res 2");
    let dest = temp.path().join("res");
    build_tree(&src, &[("a.txt", "A"), ("sub/b.txt", "B")]);
    fs::create_dir_all(&dest).unwrap();

    let cfg = config_for(&dest, &[src.clone()]).with_semantics(FileSemantics::Move);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    Executor::new().apply(&merge_plan, &cfg);

    assert!(is_drained(&src).unwrap());
    let src_canonical = src.canonicalize().unwrap();

    let mut cache = FolderCache::open(temp.path().join("cache")).unwrap();
    let record = cache.cache_folder(&src, &src).unwrap();
    assert!(!src.exists());

    let listed = cache.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(listed[0].original_path, src_canonical);

    cache.restore(&record.id).unwrap();
    assert!(src.is_dir());
    assert!(src.join("sub").is_dir());
    assert!(cache.list().is_empty());
}

#[test]
fn partially_drained_source_is_not_cached() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    // The identical file is skipped, so it stays in the source tree.
    build_tree(&src, &[("keep.txt", "X"), ("move.txt", "Y")]);
    build_tree(&dest, &[("keep.txt", "X")]);

    let cfg = config_for(&dest, &[src.clone()]).with_semantics(FileSemantics::Move);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    Executor::new().apply(&merge_plan, &cfg);

    assert!(!is_drained(&src).unwrap());
    let mut cache = FolderCache::open(temp.path().join("cache")).unwrap();
    assert!(matches!(
        cache.cache_folder(&src, &src),
        Err(FusionError::Conflict(_))
    ));
}

#[test]
fn cache_list_is_most_recent_first() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();

    let mut cache = FolderCache::open(temp.path().join("cache")).unwrap();
    cache.cache_folder(&first, temp.path()).unwrap();
    let newest = cache.cache_folder(&second, temp.path()).unwrap();

    let listed = cache.list();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newest.id);
}

#[test]
fn unknown_cache_id_is_not_found() {
    let temp = TempDir::new().unwrap();
    let mut cache = FolderCache::open(temp.path().join("cache")).unwrap();
    assert!(matches!(
        cache.restore("no-such-id"),
        Err(FusionError::NotFound(_))
    ));
    assert!(matches!(
        cache.delete("no-such-id"),
        Err(FusionError::NotFound(_))
    ));
}

#[test]
fn move_merge_can_be_undone_from_its_journal() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    build_tree(&src, &[("a.txt", "A"), ("conflict.txt", "new")]);
    build_tree(&dest, &[("conflict.txt", "old")]);
    let source_before = snapshot(&src);
    let dest_before = snapshot(&dest);

    let cfg = config_for(&dest, &[src.clone()]).with_semantics(FileSemantics::Move);
    let merge_plan = plan(&src, &dest, &cfg).unwrap();
    let report = Executor::new().apply(&merge_plan, &cfg);
    assert_eq!(report.operations.len(), 2);

    let journal = BackupJournal::new(dest.clone(), vec![src.clone()], report.operations);
    let backup_path = journal
        .save(&temp.path().join("backups"))
        .unwrap()
        .expect("journal with operations should be saved");

    let loaded = read_backup(&backup_path).unwrap();
    let summary = loaded.restore(false);
    assert_eq!(summary.restored, 2);
    assert_eq!(summary.errors, 0);

    assert_eq!(snapshot(&src), source_before);
    assert_eq!(snapshot(&dest), dest_before);
}
