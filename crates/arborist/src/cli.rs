//! CLI argument parsing with clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::ConfigCommands;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Arborist - Clean up git branches that are merged or gone
#[derive(Parser)]
#[command(name = "arborist")]
#[command(version = VERSION)]
#[command(about = "Clean up git branches that are merged or whose remote is gone")]
#[command(long_about = "Arborist inspects the local branches of a git repository and removes the ones that are safe to delete.\n\nA branch is deleted when it is fully merged into the reference branch, or when its upstream no longer exists on the remote. The current branch and protected branches are never deleted.\n\nAfter deleting branches, arborist prunes stale remote-tracking refs and runs garbage collection.")]
pub struct Cli {
    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: ~/.arborist.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete merged and gone branches
    ///
    /// Fetches, classifies every local branch, deletes the safe ones, then prunes and runs gc.
    #[command(long_about = "Delete merged and gone branches.\n\nSteps:\n  1. git fetch --all --prune (skipped with --no-fetch or --dry-run)\n  2. Classify every local branch\n  3. Delete merged branches (git branch -d) and gone branches (git branch -D)\n  4. Prune remote-tracking refs and run git gc (skipped with --no-gc)\n\nThe current branch, the reference branch, and protected branches are never deleted.\nBy default each deletion is confirmed interactively.")]
    Clean(CleanArgs),

    /// Show how every local branch would be classified
    ///
    /// Read-only: nothing is fetched or deleted.
    #[command(long_about = "Show how every local branch would be classified.\n\nDispositions:\n  current    the checked-out branch\n  protected  listed in protected_branches or the reference branch\n  merged     merged into the reference branch (would be deleted)\n  gone       upstream no longer exists (would be deleted)\n  keep       none of the above\n\nNothing is fetched or deleted.")]
    Status(SelectionArgs),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Options that change which branches are selected
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Additional protected branches (comma-separated, `prefix/*` allowed)
    #[arg(short, long, value_delimiter = ',', value_name = "BRANCHES")]
    pub protect: Vec<String>,

    /// Branch to check merges against (default from config, usually main)
    #[arg(long, value_name = "BRANCH")]
    pub reference: Option<String>,

    /// Timeout for each git command, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Options for `arborist clean`
#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    /// Show what would be deleted without deleting
    #[arg(short = 'd', long, conflicts_with = "apply")]
    pub dry_run: bool,

    /// Delete even when dry_run_by_default is set in the configuration
    #[arg(long)]
    pub apply: bool,

    /// Don't ask for confirmation before deleting branches
    #[arg(short = 'n', long)]
    pub no_interactive: bool,

    /// Skip remote-tracking prune and garbage collection
    #[arg(long)]
    pub no_gc: bool,

    /// Skip fetching from remotes before classifying
    #[arg(long)]
    pub no_fetch: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Get the command args for use in the application
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_clean_flags() {
        let cli = Cli::try_parse_from([
            "arborist",
            "clean",
            "-d",
            "-n",
            "--no-gc",
            "--protect",
            "develop,release/*",
            "--reference",
            "trunk",
        ])
        .unwrap();
        let Some(Commands::Clean(args)) = cli.command else {
            panic!("expected clean command");
        };
        assert!(args.dry_run);
        assert!(args.no_interactive);
        assert!(args.no_gc);
        assert!(!args.no_fetch);
        assert_eq!(args.selection.protect, vec!["develop", "release/*"]);
        assert_eq!(args.selection.reference.as_deref(), Some("trunk"));
    }

    #[test]
    fn test_dry_run_conflicts_with_apply() {
        assert!(Cli::try_parse_from(["arborist", "clean", "--dry-run", "--apply"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["arborist", "status", "--json", "--config", "x.toml"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
