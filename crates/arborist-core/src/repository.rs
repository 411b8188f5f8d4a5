//! Repository access port
//!
//! The planner and executor only talk to a repository through
//! [`RepositoryPort`]. [`crate::git::GitCli`] implements it on top of the git
//! command line; tests supply in-memory doubles.

use crate::error::ArboristError;
use crate::types::DeleteMode;

/// A local branch as enumerated by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBranch {
    /// Branch name (without `refs/heads/`)
    pub name: String,
    /// Whether HEAD points at this branch
    pub is_current: bool,
    /// Configured upstream (e.g. `origin/feature`), if any
    pub upstream: Option<String>,
    /// Whether the configured upstream still exists
    pub upstream_exists: bool,
}

impl RawBranch {
    /// Branch without an upstream
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_current: false,
            upstream: None,
            upstream_exists: false,
        }
    }

    /// Branch tracking `upstream`
    pub fn tracking(name: impl Into<String>, upstream: impl Into<String>, exists: bool) -> Self {
        Self {
            name: name.into(),
            is_current: false,
            upstream: Some(upstream.into()),
            upstream_exists: exists,
        }
    }

    /// Mark as the checked-out branch
    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }
}

/// Capabilities the cleanup engine needs from a repository.
///
/// Every call is a blocking round-trip. Implementations are expected to bound
/// each call by their own timeout and report it as an error.
pub trait RepositoryPort {
    /// Enumerate local branches in a stable order
    fn list_branches(&self) -> Result<Vec<RawBranch>, ArboristError>;

    /// Whether every commit of `branch` is reachable from `reference`
    fn is_merged(&self, branch: &str, reference: &str) -> Result<bool, ArboristError>;

    /// Delete a local branch
    fn delete_branch(&self, branch: &str, mode: DeleteMode) -> Result<(), ArboristError>;

    /// Remove remote-tracking refs whose remote branch no longer exists
    fn prune_remote_tracking(&self) -> Result<(), ArboristError>;

    /// Run garbage collection
    fn garbage_collect(&self) -> Result<(), ArboristError>;

    /// Fetch from all remotes, pruning stale remote-tracking refs
    fn fetch_prune(&self) -> Result<(), ArboristError>;
}
