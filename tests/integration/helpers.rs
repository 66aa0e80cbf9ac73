//! Shared test helpers for merge integration tests

use std::fs;
use std::path::{Path, PathBuf};

use fusion::models::{MergeConfig, SourceSelection};

/// Build a directory tree from (relative path, content) pairs under `root`.
pub fn build_tree(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).expect("Failed to create tree root");
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent directory");
        fs::write(&path, content).expect("Failed to write test file");
    }
}

/// Merge configuration with explicit sources, everything else defaulted.
pub fn config_for(dest: &Path, sources: &[PathBuf]) -> MergeConfig {
    MergeConfig::new(
        dest.to_path_buf(),
        SourceSelection::Explicit(sources.to_vec()),
    )
}

/// All paths under `root`, relative, sorted, files suffixed with their content.
/// Directory structure and file bytes in one comparable snapshot.
pub fn snapshot(root: &Path) -> Vec<String> {
    fn visit(dir: &Path, root: &Path, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let rel = path.strip_prefix(root).unwrap().display().to_string();
            if path.is_dir() {
                out.push(format!("{rel}/"));
                visit(&path, root, out);
            } else {
                let content = fs::read_to_string(&path).unwrap_or_default();
                out.push(format!("{rel}={content}"));
            }
        }
    }
    let mut out = Vec::new();
    if root.exists() {
        visit(root, root, &mut out);
    }
    out.sort();
    out
}
