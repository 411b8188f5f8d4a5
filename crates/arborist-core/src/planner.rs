//! Cleanup planning
//!
//! Turns repository state into an ordered [`CleanupPlan`]. Plans preserve the
//! order in which the repository enumerated branches, so the same snapshot set
//! and configuration always produce the same plan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::classify;
use crate::config::CleanupConfig;
use crate::error::ArboristError;
use crate::repository::{RawBranch, RepositoryPort};
use crate::types::{BranchSnapshot, CleanupPlan, PlanEntry, UpstreamState};

/// A branch whose classification data was incomplete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWarning {
    /// Branch name
    pub branch: String,
    /// What could not be determined
    pub message: String,
}

/// Snapshots of every local branch plus any data gaps found while building them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSet {
    pub snapshots: Vec<BranchSnapshot>,
    pub warnings: Vec<SnapshotWarning>,
}

impl SnapshotSet {
    /// The checked-out branch, if HEAD is on one
    pub fn current_branch(&self) -> Option<&str> {
        self.snapshots
            .iter()
            .find(|s| s.is_current)
            .map(|s| s.name.as_str())
    }
}

fn upstream_state(raw: &RawBranch) -> UpstreamState {
    match (&raw.upstream, raw.upstream_exists) {
        (None, _) => UpstreamState::NoUpstream,
        (Some(_), true) => UpstreamState::TrackingOk,
        (Some(_), false) => UpstreamState::TrackingGone,
    }
}

/// Build branch snapshots from the repository.
///
/// Failing to enumerate branches is fatal. Failing to determine one branch's
/// merge status only marks that snapshot as unknown, which keeps the branch.
/// Merge status is not queried for the current branch or protected branches,
/// since neither can ever be deleted.
pub fn collect_snapshots(
    repo: &dyn RepositoryPort,
    config: &CleanupConfig,
) -> Result<SnapshotSet, ArboristError> {
    config.validate()?;

    let raw_branches = repo.list_branches()?;
    let mut set = SnapshotSet::default();
    let mut seen = HashSet::new();

    for raw in raw_branches {
        if raw.name.is_empty() {
            warn!("ignoring branch with empty name");
            continue;
        }
        if !seen.insert(raw.name.clone()) {
            warn!(branch = %raw.name, "ignoring duplicate branch");
            set.warnings.push(SnapshotWarning {
                branch: raw.name.clone(),
                message: "listed more than once; later entries ignored".to_string(),
            });
            continue;
        }

        let upstream = upstream_state(&raw);
        if raw.is_current || config.is_protected(&raw.name) {
            set.snapshots
                .push(BranchSnapshot::new(raw.name, raw.is_current, upstream, false));
            continue;
        }

        match repo.is_merged(&raw.name, &config.reference_branch) {
            Ok(merged) => {
                debug!(branch = %raw.name, merged, ?upstream, "collected branch");
                set.snapshots
                    .push(BranchSnapshot::new(raw.name, false, upstream, merged));
            }
            Err(e) => {
                warn!(branch = %raw.name, error = %e, "could not determine merge status; keeping branch");
                set.warnings.push(SnapshotWarning {
                    branch: raw.name.clone(),
                    message: format!("merge status unknown ({}); branch kept", e),
                });
                set.snapshots
                    .push(BranchSnapshot::unknown(raw.name, false, upstream));
            }
        }
    }

    Ok(set)
}

/// Build the ordered deletion plan for a snapshot set.
///
/// Only `MergedDeletable` and `GoneDeletable` branches are included, in input
/// order. The result is checked with [`verify`] before it is returned.
pub fn plan(
    snapshots: &[BranchSnapshot],
    config: &CleanupConfig,
) -> Result<CleanupPlan, ArboristError> {
    config.validate()?;

    let entries: Vec<PlanEntry> = snapshots
        .iter()
        .filter_map(|snapshot| {
            let disposition = classify(snapshot, config);
            debug!(branch = %snapshot.name, disposition = disposition.as_str(), "classified");
            disposition.delete_reason().map(|reason| PlanEntry {
                branch: snapshot.name.clone(),
                reason,
            })
        })
        .collect();

    let plan = CleanupPlan {
        entries,
        current_branch: snapshots
            .iter()
            .find(|s| s.is_current)
            .map(|s| s.name.clone()),
        reference_branch: config.reference_branch.clone(),
    };

    verify(&plan, config)?;
    Ok(plan)
}

/// Check a plan against the safety invariants.
///
/// No entry may name the current branch or a protected branch, and no branch
/// may appear twice. A violation means the classifier and planner disagree and
/// is reported as [`ArboristError::PlanInvariant`].
pub fn verify(plan: &CleanupPlan, config: &CleanupConfig) -> Result<(), ArboristError> {
    let mut seen = HashSet::new();
    for entry in &plan.entries {
        if plan.current_branch.as_deref() == Some(entry.branch.as_str()) {
            return Err(ArboristError::PlanInvariant {
                branch: entry.branch.clone(),
                reason: "branch is currently checked out".to_string(),
            });
        }
        if config.is_protected(&entry.branch) {
            return Err(ArboristError::PlanInvariant {
                branch: entry.branch.clone(),
                reason: "branch is protected".to_string(),
            });
        }
        if !seen.insert(entry.branch.as_str()) {
            return Err(ArboristError::PlanInvariant {
                branch: entry.branch.clone(),
                reason: "branch appears more than once".to_string(),
            });
        }
    }
    Ok(())
}
