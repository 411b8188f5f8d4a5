//! Core data types (BranchSnapshot, Disposition, CleanupPlan, RunSummary, etc.)

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relationship between a local branch and its configured upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamState {
    /// No upstream configured
    NoUpstream,
    /// Upstream configured and present
    TrackingOk,
    /// Upstream configured but no longer present on the remote
    TrackingGone,
}

/// Read-only description of one local branch at plan time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSnapshot {
    /// Branch name (without `refs/heads/`)
    pub name: String,
    /// Whether this is the checked-out branch
    pub is_current: bool,
    /// Upstream tracking state
    pub upstream_state: UpstreamState,
    /// Every commit on the branch is reachable from the reference branch
    pub merged_into_reference: bool,
    /// False when merge status could not be determined
    #[serde(default = "default_status_known")]
    pub status_known: bool,
}

fn default_status_known() -> bool {
    true
}

impl BranchSnapshot {
    /// Snapshot with fully known status
    pub fn new(
        name: impl Into<String>,
        is_current: bool,
        upstream_state: UpstreamState,
        merged_into_reference: bool,
    ) -> Self {
        Self {
            name: name.into(),
            is_current,
            upstream_state,
            merged_into_reference,
            status_known: true,
        }
    }

    /// Snapshot whose merge status could not be determined
    pub fn unknown(name: impl Into<String>, is_current: bool, upstream_state: UpstreamState) -> Self {
        Self {
            name: name.into(),
            is_current,
            upstream_state,
            merged_into_reference: false,
            status_known: false,
        }
    }
}

/// Why a branch is scheduled for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteReason {
    /// Fully merged into the reference branch
    Merged,
    /// Upstream no longer exists
    Gone,
}

impl DeleteReason {
    /// Short label used in prompts and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteReason::Merged => "merged",
            DeleteReason::Gone => "gone",
        }
    }
}

impl fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Forbidden by configuration
    Protected,
    /// The checked-out branch
    Current,
    /// Safe to delete, merged into the reference branch
    MergedDeletable,
    /// Safe to delete, upstream is gone
    GoneDeletable,
    /// Unmerged, not gone, not protected, not current
    Keep,
}

impl Disposition {
    /// Deletion reason for deletable dispositions
    pub fn delete_reason(&self) -> Option<DeleteReason> {
        match self {
            Disposition::MergedDeletable => Some(DeleteReason::Merged),
            Disposition::GoneDeletable => Some(DeleteReason::Gone),
            Disposition::Protected | Disposition::Current | Disposition::Keep => None,
        }
    }

    /// Short label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Protected => "protected",
            Disposition::Current => "current",
            Disposition::MergedDeletable => "merged",
            Disposition::GoneDeletable => "gone",
            Disposition::Keep => "keep",
        }
    }
}

/// How the repository should delete a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Refuse if the branch is not merged (`git branch -d`)
    Safe,
    /// Delete regardless of merge state (`git branch -D`)
    Force,
}

impl From<DeleteReason> for DeleteMode {
    fn from(reason: DeleteReason) -> Self {
        match reason {
            DeleteReason::Merged => DeleteMode::Safe,
            DeleteReason::Gone => DeleteMode::Force,
        }
    }
}

/// One branch destined for deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Branch name
    pub branch: String,
    /// Why it is deletable
    pub reason: DeleteReason,
}

/// Ordered deletion plan
///
/// Only the planner builds plans, so every plan in circulation has passed
/// the safety check in [`crate::planner::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupPlan {
    pub(crate) entries: Vec<PlanEntry>,
    pub(crate) current_branch: Option<String>,
    pub(crate) reference_branch: String,
}

impl CleanupPlan {
    /// Plan entries in snapshot order
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Checked-out branch at plan time, if HEAD was on a branch
    pub fn current_branch(&self) -> Option<&str> {
        self.current_branch.as_deref()
    }

    /// Merge baseline the plan was computed against
    pub fn reference_branch(&self) -> &str {
        &self.reference_branch
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries with the given reason
    pub fn count(&self, reason: DeleteReason) -> usize {
        self.entries.iter().filter(|e| e.reason == reason).count()
    }
}

/// What happened to one plan entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum OutcomeResult {
    /// Branch deleted
    Deleted,
    /// Dry run: branch would have been deleted
    WouldDelete,
    /// User declined the deletion
    SkippedByUser,
    /// Deletion was attempted and failed
    Failed(String),
}

/// Per-branch execution record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Branch name
    pub branch: String,
    /// Why it was scheduled
    pub reason: DeleteReason,
    /// What happened
    #[serde(flatten)]
    pub result: OutcomeResult,
}

/// Result of one maintenance step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum StepResult {
    Ok,
    Failed(String),
    Skipped,
}

impl StepResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepResult::Failed(_))
    }
}

/// Remote-tracking prune and garbage collection results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceOutcome {
    pub prune: StepResult,
    pub gc: StepResult,
}

impl MaintenanceOutcome {
    /// Both steps skipped
    pub fn skipped() -> Self {
        Self {
            prune: StepResult::Skipped,
            gc: StepResult::Skipped,
        }
    }

    /// Whether either step actually ran
    pub fn ran(&self) -> bool {
        self.prune != StepResult::Skipped || self.gc != StepResult::Skipped
    }
}

/// Overall state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Plan was empty and maintenance did not fail
    NothingToDo,
    /// Every entry processed without failure
    Completed,
    /// Run finished, but an entry or a maintenance step failed
    CompletedWithFailures,
    /// Cancelled or quit before the run finished
    Interrupted,
}

/// Aggregated result of executing a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Overall status
    pub status: RunStatus,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Per-branch outcomes in plan order
    pub outcomes: Vec<Outcome>,
    /// Number of plan entries never reached
    pub unprocessed: usize,
    /// Maintenance step results
    pub maintenance: MaintenanceOutcome,
    /// Reflog expiry from the configuration, for recovery hints
    pub reflog_expiry: String,
    /// When execution started
    pub started_at: DateTime<Utc>,
    /// When execution finished
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&OutcomeResult) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.result)).count()
    }

    pub fn deleted(&self) -> usize {
        self.count(|r| matches!(r, OutcomeResult::Deleted))
    }

    pub fn would_delete(&self) -> usize {
        self.count(|r| matches!(r, OutcomeResult::WouldDelete))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, OutcomeResult::SkippedByUser))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, OutcomeResult::Failed(_)))
    }

    /// Whether any branch or maintenance step failed
    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.maintenance.prune.is_failed() || self.maintenance.gc.is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_reasons() {
        assert_eq!(
            Disposition::MergedDeletable.delete_reason(),
            Some(DeleteReason::Merged)
        );
        assert_eq!(
            Disposition::GoneDeletable.delete_reason(),
            Some(DeleteReason::Gone)
        );
        assert_eq!(Disposition::Keep.delete_reason(), None);
        assert_eq!(Disposition::Protected.delete_reason(), None);
        assert_eq!(Disposition::Current.delete_reason(), None);
    }

    #[test]
    fn test_delete_mode_from_reason() {
        assert_eq!(DeleteMode::from(DeleteReason::Merged), DeleteMode::Safe);
        assert_eq!(DeleteMode::from(DeleteReason::Gone), DeleteMode::Force);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome {
            branch: "feature/a".to_string(),
            reason: DeleteReason::Gone,
            result: OutcomeResult::Failed("branch not found".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["branch"], "feature/a");
        assert_eq!(json["reason"], "gone");
        assert_eq!(json["result"], "failed");
        assert_eq!(json["detail"], "branch not found");
    }

    #[test]
    fn test_snapshot_status_known_defaults_true() {
        let json = r#"{"name":"x","is_current":false,"upstream_state":"tracking_gone","merged_into_reference":false}"#;
        let snapshot: BranchSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.status_known);
        assert_eq!(snapshot.upstream_state, UpstreamState::TrackingGone);
    }

    #[test]
    fn test_maintenance_skipped() {
        let maintenance = MaintenanceOutcome::skipped();
        assert!(!maintenance.ran());
        let maintenance = MaintenanceOutcome {
            prune: StepResult::Ok,
            gc: StepResult::Failed("boom".to_string()),
        };
        assert!(maintenance.ran());
        assert!(maintenance.gc.is_failed());
    }
}
