use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fusion::commands::{backup_cmd, cache_cmd, merge};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fusion")]
#[command(about = "Content-aware folder merge CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge source folders into a destination folder
    Merge {
        /// Destination folder receiving merged content
        #[arg(short, long)]
        dest: PathBuf,

        /// Source folders to merge, in order
        #[arg(short, long, num_args = 1.., conflicts_with = "pattern")]
        source: Vec<PathBuf>,

        /// Glob pattern to find source folders (e.g. "RESOURCES *")
        #[arg(short, long)]
        pattern: Option<String>,

        /// Move files out of the sources instead of copying them
        #[arg(short = 'm', long = "move")]
        move_files: bool,

        /// Show what would happen without making changes
        #[arg(short = 'S', long)]
        simulate: bool,

        /// Log every planned action
        #[arg(short, long)]
        verbose: bool,

        /// Include hidden files and folders
        #[arg(short = 'H', long)]
        include_hidden: bool,

        /// Skip writing an undo backup for move-semantics merges
        #[arg(long)]
        no_backup: bool,

        /// Override the cached-folder area location
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Override the backup directory location
        #[arg(long)]
        backup_dir: Option<PathBuf>,
    },

    /// Manage cached (drained) source folders
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Manage merge undo backups
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// List cached folders, most recent first
    List {
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Restore a cached folder to its original location
    Restore {
        /// Cached folder id (see `fusion cache list`)
        id: String,

        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Restore a cached folder to a new location
    Save {
        /// Cached folder id (see `fusion cache list`)
        id: String,

        /// Target path; must not exist yet
        path: PathBuf,

        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Permanently delete a cached folder
    Delete {
        /// Cached folder id (see `fusion cache list`)
        id: String,

        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum BackupCommands {
    /// List saved merge backups, newest first
    List {
        #[arg(long)]
        backup_dir: Option<PathBuf>,
    },

    /// Undo a merge from its backup journal
    Restore {
        /// Path to the backup file
        path: PathBuf,

        /// Show what would be restored without making changes
        #[arg(short = 'S', long)]
        simulate: bool,
    },

    /// Delete a backup file
    Delete {
        /// Path to the backup file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            dest,
            source,
            pattern,
            move_files,
            simulate,
            verbose,
            include_hidden,
            no_backup,
            cache_dir,
            backup_dir,
        } => {
            let cancel = Arc::new(AtomicBool::new(false));
            let handler_flag = Arc::clone(&cancel);
            ctrlc::set_handler(move || {
                handler_flag.store(true, Ordering::SeqCst);
            })?;

            merge::execute(
                merge::MergeArgs {
                    dest,
                    sources: source,
                    pattern,
                    move_files,
                    simulate,
                    verbose,
                    include_hidden,
                    no_backup,
                    cache_dir,
                    backup_dir,
                },
                cancel,
            )
        }
        Commands::Cache { command } => match command {
            CacheCommands::List { cache_dir } => cache_cmd::list(cache_dir),
            CacheCommands::Restore { id, cache_dir } => cache_cmd::restore(id, cache_dir),
            CacheCommands::Save {
                id,
                path,
                cache_dir,
            } => cache_cmd::save(id, path, cache_dir),
            CacheCommands::Delete { id, cache_dir } => cache_cmd::delete(id, cache_dir),
        },
        Commands::Backup { command } => match command {
            BackupCommands::List { backup_dir } => backup_cmd::list(backup_dir),
            BackupCommands::Restore { path, simulate } => backup_cmd::restore(path, simulate),
            BackupCommands::Delete { path } => backup_cmd::delete(path),
        },
    }
}
