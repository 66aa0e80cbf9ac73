//! Cached folder management
//!
//! Usage: fusion cache <list|restore <ID>|save <ID> <PATH>|delete <ID>>
//!
//! Thin CLI surface over `cache::FolderCache`; each invocation opens the
//! cache index, performs one operation, and flushes the manifest.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::cache::FolderCache;

fn open_cache(cache_dir: Option<PathBuf>) -> Result<FolderCache> {
    let root = match cache_dir {
        Some(dir) => dir,
        None => FolderCache::default_root()?,
    };
    Ok(FolderCache::open(root)?)
}

/// List cached folders, most recently cached first.
pub fn list(cache_dir: Option<PathBuf>) -> Result<()> {
    let cache = open_cache(cache_dir)?;
    let records = cache.list();

    if records.is_empty() {
        println!("No cached folders.");
        return Ok(());
    }

    println!("{}", "Cached folders:".bold());
    for record in records {
        println!(
            "  {}  {}  (cached {})",
            record.id.cyan(),
            record.original_path.display(),
            record.cached_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// Restore a cached folder to its original location.
pub fn restore(id: String, cache_dir: Option<PathBuf>) -> Result<()> {
    let mut cache = open_cache(cache_dir)?;
    cache.restore(&id)?;
    println!("{} restored folder {}", "OK:".green(), id);
    Ok(())
}

/// Restore a cached folder to a new location.
pub fn save(id: String, path: PathBuf, cache_dir: Option<PathBuf>) -> Result<()> {
    let mut cache = open_cache(cache_dir)?;
    cache.restore_to(&id, &path)?;
    println!(
        "{} restored folder {} to {}",
        "OK:".green(),
        id,
        path.display()
    );
    Ok(())
}

/// Permanently delete a cached folder.
pub fn delete(id: String, cache_dir: Option<PathBuf>) -> Result<()> {
    let mut cache = open_cache(cache_dir)?;
    cache.delete(&id)?;
    println!("{} deleted cached folder {}", "OK:".green(), id);
    Ok(())
}
