//! Branch classification
//!
//! `classify` is a pure function of a snapshot and the configuration. The
//! checks run in a fixed order and the first match wins: the current-branch
//! and protection gates always dominate, and a branch that is both merged and
//! gone is reported as merged.

use serde::{Deserialize, Serialize};

use crate::config::CleanupConfig;
use crate::types::{BranchSnapshot, Disposition, UpstreamState};

/// Decide what to do with one branch
pub fn classify(snapshot: &BranchSnapshot, config: &CleanupConfig) -> Disposition {
    if snapshot.is_current {
        return Disposition::Current;
    }
    if config.is_protected(&snapshot.name) {
        return Disposition::Protected;
    }
    if !snapshot.status_known {
        // Never delete on incomplete data.
        return Disposition::Keep;
    }
    if snapshot.merged_into_reference {
        return Disposition::MergedDeletable;
    }
    if snapshot.upstream_state == UpstreamState::TrackingGone {
        return Disposition::GoneDeletable;
    }
    Disposition::Keep
}

/// A snapshot together with its disposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedBranch {
    #[serde(flatten)]
    pub snapshot: BranchSnapshot,
    pub disposition: Disposition,
}

/// Classify every snapshot, preserving input order
pub fn classify_all(snapshots: &[BranchSnapshot], config: &CleanupConfig) -> Vec<ClassifiedBranch> {
    snapshots
        .iter()
        .map(|snapshot| ClassifiedBranch {
            snapshot: snapshot.clone(),
            disposition: classify(snapshot, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPSTREAM_STATES: [UpstreamState; 3] = [
        UpstreamState::NoUpstream,
        UpstreamState::TrackingOk,
        UpstreamState::TrackingGone,
    ];

    fn config() -> CleanupConfig {
        CleanupConfig {
            protected_branches: vec!["main".to_string(), "develop".to_string()],
            ..CleanupConfig::default()
        }
    }

    #[test]
    fn test_current_dominates_everything() {
        let config = config();
        for name in ["main", "develop", "feature/x"] {
            for upstream in UPSTREAM_STATES {
                for merged in [true, false] {
                    let snapshot = BranchSnapshot::new(name, true, upstream, merged);
                    assert_eq!(classify(&snapshot, &config), Disposition::Current);
                }
            }
            let unknown = BranchSnapshot::unknown(name, true, UpstreamState::TrackingGone);
            assert_eq!(classify(&unknown, &config), Disposition::Current);
        }
    }

    #[test]
    fn test_protected_even_if_merged_or_gone() {
        let config = config();
        for upstream in UPSTREAM_STATES {
            for merged in [true, false] {
                let snapshot = BranchSnapshot::new("develop", false, upstream, merged);
                assert_eq!(classify(&snapshot, &config), Disposition::Protected);
            }
        }
    }

    #[test]
    fn test_reference_branch_protected_when_not_listed() {
        let config = CleanupConfig {
            protected_branches: vec![],
            reference_branch: "trunk".to_string(),
            ..CleanupConfig::default()
        };
        let snapshot = BranchSnapshot::new("trunk", false, UpstreamState::TrackingGone, true);
        assert_eq!(classify(&snapshot, &config), Disposition::Protected);
    }

    #[test]
    fn test_unprotected_decision_table() {
        let config = config();
        for upstream in UPSTREAM_STATES {
            let merged = BranchSnapshot::new("feature/x", false, upstream, true);
            assert_eq!(classify(&merged, &config), Disposition::MergedDeletable);

            let unmerged = BranchSnapshot::new("feature/x", false, upstream, false);
            let expected = if upstream == UpstreamState::TrackingGone {
                Disposition::GoneDeletable
            } else {
                Disposition::Keep
            };
            assert_eq!(classify(&unmerged, &config), expected);
        }
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let config = config();
        let snapshot = BranchSnapshot::unknown("feature/x", false, UpstreamState::TrackingGone);
        assert_eq!(classify(&snapshot, &config), Disposition::Keep);
    }

    #[test]
    fn test_pattern_protection() {
        let config = CleanupConfig {
            protected_branches: vec!["release/*".to_string()],
            ..CleanupConfig::default()
        };
        let snapshot = BranchSnapshot::new("release/2.0", false, UpstreamState::TrackingGone, true);
        assert_eq!(classify(&snapshot, &config), Disposition::Protected);
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let config = config();
        let snapshots = vec![
            BranchSnapshot::new("main", true, UpstreamState::TrackingOk, true),
            BranchSnapshot::new("feature/a", false, UpstreamState::TrackingGone, false),
            BranchSnapshot::new("feature/b", false, UpstreamState::TrackingOk, true),
        ];
        let classified = classify_all(&snapshots, &config);
        let dispositions: Vec<_> = classified.iter().map(|c| c.disposition).collect();
        assert_eq!(
            dispositions,
            vec![
                Disposition::Current,
                Disposition::GoneDeletable,
                Disposition::MergedDeletable
            ]
        );
        assert_eq!(classified[1].snapshot.name, "feature/a");
    }
}
