//! Backup journal management
//!
//! Usage: fusion backup <list|restore <PATH> [--simulate]|delete <PATH>>

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::backup::{self, BackupJournal};

fn backups_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    override_dir.or_else(BackupJournal::default_dir).ok_or_else(|| {
        anyhow::anyhow!("no application data directory available on this platform")
    })
}

/// List saved merge backups, newest first.
pub fn list(backup_dir: Option<PathBuf>) -> Result<()> {
    let dir = backups_dir(backup_dir)?;
    let backups = backup::list_backups(&dir)?;

    if backups.is_empty() {
        println!("No backups.");
        return Ok(());
    }

    println!("{}", "Backups:".bold());
    for (path, journal) in backups {
        println!(
            "  {}  {} operation(s), merged into {}",
            path.display().to_string().cyan(),
            journal.operations.len(),
            journal.destination.display()
        );
    }
    Ok(())
}

/// Undo a merge from its backup journal.
pub fn restore(path: PathBuf, simulate: bool) -> Result<()> {
    let journal = backup::read_backup(&path)?;
    let summary = journal.restore(simulate);

    let prefix = if simulate { "[simulate] " } else { "" };
    if summary.errors == 0 {
        println!(
            "{}{} {} file(s) restored",
            prefix,
            "OK:".green(),
            summary.restored
        );
    } else {
        println!(
            "{}{} {} file(s) restored, {} error(s)",
            prefix,
            "Partial:".yellow(),
            summary.restored,
            summary.errors
        );
    }
    Ok(())
}

/// Delete a backup journal file.
pub fn delete(path: PathBuf) -> Result<()> {
    backup::delete_backup(&path)?;
    println!("{} deleted backup {}", "OK:".green(), path.display());
    Ok(())
}
