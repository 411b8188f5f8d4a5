//! Configuration handling for arborist
//!
//! The configuration is an immutable value handed to the classifier, planner
//! and executor. Loading it from disk is a convenience for callers; nothing in
//! the core looks up configuration on its own.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ArboristError;

/// Branch names may not contain whitespace or git's reserved ref characters.
/// A single trailing `*` turns a protected entry into a prefix pattern.
static PROTECTED_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s~^:?*\[\\]+\*?$").expect("valid regex"));

/// Arborist configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Cleanup settings
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

impl Config {
    /// Parse a TOML document. `origin` names the source in error messages.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ArboristError> {
        toml::from_str(content).map_err(|e| ArboristError::ConfigParse {
            path: origin.to_string(),
            reason: e.message().to_string(),
        })
    }

    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ArboristError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String, ArboristError> {
        toml::to_string_pretty(self).map_err(|e| ArboristError::Config(e.to_string()))
    }
}

/// Cleanup settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupConfig {
    /// Branches that must never be deleted. `release/*` protects a prefix.
    #[serde(default = "default_protected_branches")]
    pub protected_branches: Vec<String>,

    /// Branch used as the merge baseline
    #[serde(default = "default_reference_branch")]
    pub reference_branch: String,

    /// Ask before deleting each branch
    #[serde(default = "default_true")]
    pub interactive: bool,

    /// Skip remote-tracking prune and garbage collection
    #[serde(default)]
    pub skip_gc: bool,

    /// How long deleted commits stay recoverable through the reflog (display only)
    #[serde(default = "default_reflog_expiry")]
    pub reflog_expiry: String,

    /// Only report what would be deleted unless told otherwise
    #[serde(default)]
    pub dry_run_by_default: bool,

    /// Run `git fetch --prune` before inspecting branches
    #[serde(default = "default_true")]
    pub fetch_before_clean: bool,

    /// Upper bound for a single git invocation, in seconds
    #[serde(default = "default_git_timeout_secs")]
    pub git_timeout_secs: u64,
}

fn default_protected_branches() -> Vec<String> {
    vec!["main".to_string()]
}

fn default_reference_branch() -> String {
    "main".to_string()
}

fn default_reflog_expiry() -> String {
    "90.days".to_string()
}

fn default_git_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            protected_branches: default_protected_branches(),
            reference_branch: default_reference_branch(),
            interactive: true,
            skip_gc: false,
            reflog_expiry: default_reflog_expiry(),
            dry_run_by_default: false,
            fetch_before_clean: true,
            git_timeout_secs: default_git_timeout_secs(),
        }
    }
}

impl CleanupConfig {
    /// Reject configurations that cannot be planned against
    pub fn validate(&self) -> Result<(), ArboristError> {
        let reference = self.reference_branch.trim();
        if reference.is_empty() {
            return Err(ArboristError::Config(
                "reference branch must not be empty".to_string(),
            ));
        }
        if reference.ends_with('*') || !PROTECTED_ENTRY.is_match(reference) {
            return Err(ArboristError::Config(format!(
                "invalid reference branch name: {:?}",
                self.reference_branch
            )));
        }

        for entry in &self.protected_branches {
            if entry.trim().is_empty() {
                return Err(ArboristError::Config(
                    "protected branch entries must not be empty".to_string(),
                ));
            }
            if !PROTECTED_ENTRY.is_match(entry) {
                return Err(ArboristError::Config(format!(
                    "invalid protected branch entry: {:?}",
                    entry
                )));
            }
        }

        if self.git_timeout_secs == 0 {
            return Err(ArboristError::Config(
                "git_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether `branch` may never be deleted under this configuration.
    ///
    /// The reference branch is always protected, whether or not it is listed.
    pub fn is_protected(&self, branch: &str) -> bool {
        if branch == self.reference_branch {
            return true;
        }
        self.protected_branches
            .iter()
            .any(|entry| match entry.strip_suffix('*') {
                Some(prefix) => branch.starts_with(prefix),
                None => branch == entry,
            })
    }

    /// Protected entries as evaluated, including the reference branch
    pub fn effective_protected(&self) -> BTreeSet<String> {
        let mut set: BTreeSet<String> = self.protected_branches.iter().cloned().collect();
        set.insert(self.reference_branch.clone());
        set
    }

    /// Append protected entries, skipping ones already present
    pub fn extend_protected<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            let entry = entry.into();
            let entry = entry.trim();
            if !entry.is_empty() && !self.protected_branches.iter().any(|p| p == entry) {
                self.protected_branches.push(entry.to_string());
            }
        }
    }

    /// Timeout applied to every git invocation
    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CleanupConfig::default();
        assert_eq!(config.protected_branches, vec!["main"]);
        assert_eq!(config.reference_branch, "main");
        assert!(config.interactive);
        assert!(!config.skip_gc);
        assert_eq!(config.reflog_expiry, "90.days");
        assert!(!config.dry_run_by_default);
        assert!(config.fetch_before_clean);
        assert_eq!(config.git_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("", "test").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_document() {
        let doc = r#"
[cleanup]
protected_branches = ["main", "develop", "release/*"]
reference_branch = "develop"
interactive = false
"#;
        let config = Config::from_toml_str(doc, "test").unwrap().cleanup;
        assert_eq!(config.reference_branch, "develop");
        assert!(!config.interactive);
        assert!(!config.skip_gc);
        assert_eq!(config.protected_branches.len(), 3);
    }

    #[test]
    fn test_invalid_document() {
        let err = Config::from_toml_str("[cleanup]\ninteractive = \"yes\"", "arborist.toml")
            .unwrap_err();
        assert_eq!(err.code(), "E002");
        assert!(err.to_string().contains("arborist.toml"));
    }

    #[test]
    fn test_reference_branch_always_protected() {
        let config = CleanupConfig {
            protected_branches: vec![],
            reference_branch: "trunk".to_string(),
            ..CleanupConfig::default()
        };
        assert!(config.is_protected("trunk"));
        assert!(!config.is_protected("main"));
        assert!(config.effective_protected().contains("trunk"));
    }

    #[test]
    fn test_prefix_patterns() {
        let config = CleanupConfig {
            protected_branches: vec!["release/*".to_string(), "develop".to_string()],
            ..CleanupConfig::default()
        };
        assert!(config.is_protected("release/1.0"));
        assert!(config.is_protected("develop"));
        assert!(!config.is_protected("develop-old"));
        assert!(!config.is_protected("feature/release"));
    }

    #[test]
    fn test_validate_rejects_empty_reference() {
        let config = CleanupConfig {
            reference_branch: "  ".to_string(),
            ..CleanupConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ArboristError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        for entry in ["", "*", "bad name", "a~b", "x*y*"] {
            let config = CleanupConfig {
                protected_branches: vec![entry.to_string()],
                ..CleanupConfig::default()
            };
            assert!(config.validate().is_err(), "entry {:?} should be rejected", entry);
        }

        let config = CleanupConfig {
            reference_branch: "release/*".to_string(),
            ..CleanupConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = CleanupConfig {
            git_timeout_secs: 0,
            ..CleanupConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extend_protected_deduplicates() {
        let mut config = CleanupConfig::default();
        config.extend_protected(["main", " develop ", "", "develop"]);
        assert_eq!(config.protected_branches, vec!["main", "develop"]);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.cleanup.skip_gc = true;
        let doc = config.to_toml_string().unwrap();
        assert!(doc.contains("[cleanup]"));
        assert_eq!(Config::from_toml_str(&doc, "test").unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
