//! Command line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "linguaflow",
    version,
    about = "Language-learning screen flow in the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Preferences file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the interactive app (default)
    Run(CatalogArgs),

    /// Apply rewrite rules to every matching file under a directory
    Rewrite(RewriteArgs),

    /// Load a screen catalog and report whether it is valid
    CheckCatalog(CatalogArgs),
}

#[derive(Parser, Default)]
pub struct CatalogArgs {
    /// TOML screen catalog replacing the built-in screens
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RewriteArgs {
    /// Directory to walk
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// TOML file with [[rule]] entries
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Report what would change without writing anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Keep a .backup copy of every file before its first rewrite
    #[arg(long)]
    pub backup: bool,

    /// Hide the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}
