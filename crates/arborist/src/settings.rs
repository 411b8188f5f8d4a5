//! Configuration file location and command-line overrides

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arborist_core::{CleanupConfig, Config};

use crate::cli::{CleanArgs, SelectionArgs};

/// Configuration file name in the home directory
pub const CONFIG_FILE_NAME: &str = ".arborist.toml";

/// Resolve the configuration file: `--config` if given, else `~/.arborist.toml`
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .context("could not determine home directory"),
    }
}

/// Load the configuration file. A missing file yields the defaults.
pub fn load(explicit: Option<&Path>) -> Result<(PathBuf, Config)> {
    let path = config_path(explicit)?;
    let config = Config::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok((path, config))
}

/// Apply branch-selection flags on top of the file settings
pub fn apply_selection(args: &SelectionArgs, config: &mut CleanupConfig) {
    if let Some(reference) = &args.reference {
        config.reference_branch = reference.trim().to_string();
    }
    if let Some(secs) = args.timeout {
        config.git_timeout_secs = secs;
    }
    config.extend_protected(args.protect.iter().map(String::as_str));
}

/// Apply `clean` flags and return whether this is a dry run
pub fn apply_clean(args: &CleanArgs, config: &mut CleanupConfig) -> bool {
    apply_selection(&args.selection, config);
    if args.no_interactive {
        config.interactive = false;
    }
    if args.no_gc {
        config.skip_gc = true;
    }
    if args.no_fetch {
        config.fetch_before_clean = false;
    }
    args.dry_run || (config.dry_run_by_default && !args.apply)
}
