//! Merge command
//!
//! Usage: fusion merge --dest <DIR> [--source <DIR>...] [--pattern <GLOB>]
//!        [--move] [--simulate] [--verbose] [--include-hidden] [--no-backup]
//!
//! Resolves the configured sources, plans and executes one merge per source
//! root, then reports aggregated statistics. Under move semantics, drained
//! source roots are handed to the empty-folder cache and a backup journal is
//! saved so the merge can be undone.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::backup::BackupJournal;
use crate::cache::{is_drained, FolderCache};
use crate::engine::{plan, resolve_sources, Executor};
use crate::error::FusionError;
use crate::models::{
    FileSemantics, MergeConfig, MergeReport, RunOutcome, SourceSelection,
};

/// Options for one merge invocation, straight from the CLI.
pub struct MergeArgs {
    pub dest: PathBuf,
    pub sources: Vec<PathBuf>,
    pub pattern: Option<String>,
    pub move_files: bool,
    pub simulate: bool,
    pub verbose: bool,
    pub include_hidden: bool,
    pub no_backup: bool,
    /// Cache area override; defaults to the platform application-data dir.
    pub cache_dir: Option<PathBuf>,
    /// Backup directory override; defaults to the platform application-data dir.
    pub backup_dir: Option<PathBuf>,
}

/// Execute the merge command. `cancel` is set from the Ctrl-C handler and
/// checked by the executor between actions.
pub fn execute(args: MergeArgs, cancel: Arc<AtomicBool>) -> Result<()> {
    let selection = match (&args.pattern, args.sources.is_empty()) {
        (Some(pattern), _) => SourceSelection::Pattern {
            pattern: pattern.clone(),
            base: std::env::current_dir().context("Failed to resolve current directory")?,
        },
        (None, false) => SourceSelection::Explicit(args.sources.clone()),
        (None, true) => anyhow::bail!("either --source or --pattern is required"),
    };

    let mut config = MergeConfig::new(args.dest.clone(), selection);
    config.semantics = if args.move_files {
        FileSemantics::Move
    } else {
        FileSemantics::Copy
    };
    config.simulate = args.simulate;
    config.verbose = args.verbose;
    config.include_hidden = args.include_hidden;

    let sources = resolve_sources(&config)?;

    if config.simulate {
        println!(
            "{}",
            "Running in simulation mode: no changes will be made".yellow()
        );
    }
    println!("Destination: {}", config.destination.display());
    println!(
        "Sources: {}",
        sources
            .iter()
            .map(|s| s.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if !config.simulate && !config.destination.exists() {
        fs::create_dir_all(&config.destination).with_context(|| {
            format!(
                "Failed to create destination folder: {}",
                config.destination.display()
            )
        })?;
    }

    let executor = Executor::with_cancel_flag(cancel);
    let mut total = MergeReport::empty();

    for source in &sources {
        if total.outcome.is_cancelled() {
            break;
        }
        println!("\nMerging {}", source.display().to_string().bold());
        let source_plan = match plan(source, &config.destination, &config) {
            Ok(p) => p,
            Err(e) => {
                total.stats.record_error(e.to_string());
                continue;
            }
        };
        let report = executor.apply(&source_plan, &config);
        if config.verbose {
            for line in &report.stats.log {
                println!("  {line}");
            }
        }
        total.absorb(report);
    }

    cache_drained_sources(&sources, &config, args.cache_dir.clone(), &mut total);

    if !config.simulate && config.semantics == FileSemantics::Move && !args.no_backup {
        save_backup(&config, &sources, args.backup_dir.clone(), &total);
    }

    if !total.outcome.is_cancelled() && total.stats.errors > 0 {
        total.outcome = RunOutcome::WithErrors(total.stats.errors);
    }

    print_summary(&total);
    Ok(())
}

/// Under real-mode move semantics, relocate every drained source root into
/// the empty-folder cache. Cache failures are recorded, not fatal.
fn cache_drained_sources(
    sources: &[PathBuf],
    config: &MergeConfig,
    cache_dir: Option<PathBuf>,
    total: &mut MergeReport,
) {
    if config.simulate || config.semantics != FileSemantics::Move || total.outcome.is_cancelled()
    {
        return;
    }

    for source in sources {
        match is_drained(source) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                total.stats.record_error(e.to_string());
                continue;
            }
        }
        let result = cache_dir
            .clone()
            .map_or_else(FolderCache::default_root, Ok)
            .and_then(FolderCache::open)
            .and_then(|mut cache| cache.cache_folder(source, source));
        match result {
            Ok(record) => {
                println!(
                    "Cached drained source folder {} (id: {})",
                    source.display(),
                    record.id.cyan()
                );
            }
            Err(FusionError::Conflict(_)) => {}
            Err(e) => total.stats.record_error(e.to_string()),
        }
    }
}

fn save_backup(
    config: &MergeConfig,
    sources: &[PathBuf],
    backup_dir: Option<PathBuf>,
    total: &MergeReport,
) {
    let journal = BackupJournal::new(
        config.destination.clone(),
        sources.to_vec(),
        total.operations.clone(),
    );
    let Some(dir) = backup_dir.or_else(BackupJournal::default_dir) else {
        return;
    };
    match journal.save(&dir) {
        Ok(Some(path)) => println!("Backup saved: {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("{} {e:#}", "Warning: backup not saved:".yellow()),
    }
}

fn print_summary(total: &MergeReport) {
    let stats = &total.stats;
    println!("\n{}", "Operation summary:".bold());
    println!("  Files copied:        {}", stats.files_copied);
    println!("  Files skipped:       {}", stats.files_skipped);
    println!("  Files renamed:       {}", stats.files_renamed);
    println!("  Directories created: {}", stats.dirs_created);
    println!("  Bytes copied:        {}", stats.bytes_copied);
    println!("  Errors:              {}", stats.errors);

    match &total.outcome {
        RunOutcome::Clean => println!("\n{}", "Completed cleanly.".green()),
        RunOutcome::WithErrors(n) => {
            println!("\n{}", format!("Completed with {n} error(s):").red());
            for error in &stats.error_log {
                println!("  {} {error}", "-".red());
            }
        }
        RunOutcome::Cancelled { applied, planned } => {
            println!(
                "\n{}",
                format!("Cancelled after {applied} of {planned} actions.").yellow()
            );
        }
    }
}
