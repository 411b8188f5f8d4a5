//! Implementation of the `arborist config` commands

use std::fs;
use std::path::Path;

use arborist_core::{ArboristError, Config};
use clap::Subcommand;

use super::load_settings;
use crate::output::{ConfigData, JsonResponse, report_error};
use crate::settings;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    ///
    /// Prints the configuration file path and the settings in effect. Defaults are shown when the file does not exist.
    Show,

    /// Write a default configuration file
    ///
    /// Creates ~/.arborist.toml (or the --config path) with every setting and its default value.
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"[cleanup]
# Branches that are never deleted. A trailing * protects every branch
# starting with the text before it, e.g. "release/*".
protected_branches = ["main"]

# Branch that merged branches are checked against (always protected)
reference_branch = "main"

# Ask before deleting each branch
interactive = true

# Skip `git remote prune` and `git gc` after deleting branches
skip_gc = false

# How long deleted commits stay recoverable through the reflog
reflog_expiry = "90.days"

# Only report what would be deleted unless --apply is given
dry_run_by_default = false

# Run `git fetch --all --prune` before inspecting branches
fetch_before_clean = true

# Upper bound for a single git command, in seconds
git_timeout_secs = 30
"#;

/// Run `arborist config show`
pub fn run_config_show(
    config_path: Option<&Path>,
    json_output: bool,
    _quiet: bool,
) -> Result<i32, String> {
    let loaded = load_settings::<Option<ConfigData>>("config show", config_path, json_output);
    let (path, config) = match loaded {
        Ok(loaded) => loaded,
        Err(code) => return Ok(code),
    };
    let exists = path.exists();

    if json_output {
        let data = ConfigData {
            path: path.display().to_string(),
            exists,
            written: false,
            cleanup: config.cleanup,
        };
        JsonResponse::ok("config show", data).print();
        return Ok(0);
    }

    let rendered = config.to_toml_string().map_err(|e| e.to_string())?;
    if exists {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", rendered);
    Ok(0)
}

/// Run `arborist config init`
pub fn run_config_init(
    config_path: Option<&Path>,
    force: bool,
    json_output: bool,
    quiet: bool,
) -> Result<i32, String> {
    let path = settings::config_path(config_path).map_err(|e| format!("{:#}", e))?;

    if path.exists() && !force {
        let err = ArboristError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
        return Ok(report_error("config init", None::<ConfigData>, &err, json_output));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;

    if json_output {
        let cleanup = Config::from_toml_str(DEFAULT_CONFIG, "default configuration")
            .map_err(|e| e.to_string())?
            .cleanup;
        let data = ConfigData {
            path: path.display().to_string(),
            exists: true,
            written: true,
            cleanup,
        };
        JsonResponse::ok("config init", data).print();
    } else if !quiet {
        println!("Wrote {}", path.display());
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_defaults() {
        let config = Config::from_toml_str(DEFAULT_CONFIG, "default").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_writes_file_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("arborist.toml");

        assert_eq!(run_config_init(Some(&path), false, false, true).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        fs::write(&path, "[cleanup]\nskip_gc = true\n").unwrap();
        assert_eq!(run_config_init(Some(&path), false, false, true).unwrap(), 4);
        assert!(fs::read_to_string(&path).unwrap().contains("skip_gc = true"));

        assert_eq!(run_config_init(Some(&path), true, false, true).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
