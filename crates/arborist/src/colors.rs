//! Semantic color theme for consistent terminal output
//!
//! - `ACTIVE` => blue - spinners, headers, dry-run notices
//! - `SUCCESS` => green - deleted branches, completed steps
//! - `WARNING` => yellow - skipped branches, data gaps
//! - `FAIL` => red - failed deletions and steps

use std::sync::LazyLock;

use arborist_core::{Disposition, OutcomeResult};
use owo_colors::Style;

/// Semantic color definitions for terminal output
pub struct SemanticColors {
    /// Blue - spinners, headers, active elements
    pub active: Style,
    /// Green - completed operations, success messages
    pub success: Style,
    /// Yellow - warnings, skipped items
    pub warning: Style,
    /// Red - errors, failed items
    pub fail: Style,
    /// Dim - branches that are left alone
    pub muted: Style,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            active: Style::new().blue(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            fail: Style::new().red(),
            muted: Style::new().dimmed(),
        }
    }
}

impl SemanticColors {
    /// Style for a branch disposition in `status` output
    pub fn disposition(&self, disposition: Disposition) -> Style {
        match disposition {
            Disposition::MergedDeletable | Disposition::GoneDeletable => self.warning,
            Disposition::Current | Disposition::Protected => self.active,
            Disposition::Keep => self.muted,
        }
    }

    /// Style for a per-branch outcome
    pub fn outcome(&self, result: &OutcomeResult) -> Style {
        match result {
            OutcomeResult::Deleted => self.success,
            OutcomeResult::WouldDelete => self.active,
            OutcomeResult::SkippedByUser => self.warning,
            OutcomeResult::Failed(_) => self.fail,
        }
    }
}

/// Global default theme
pub static COLORS: LazyLock<SemanticColors> = LazyLock::new(SemanticColors::default);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletable_dispositions_share_a_style() {
        let colors = SemanticColors::default();
        assert_eq!(
            colors.disposition(Disposition::MergedDeletable),
            colors.disposition(Disposition::GoneDeletable)
        );
    }

    #[test]
    fn test_colors_global_is_accessible() {
        let _ = &COLORS.active;
        let _ = &COLORS.success;
        let _ = &COLORS.warning;
        let _ = &COLORS.fail;
        let _ = COLORS.outcome(&OutcomeResult::Failed("x".to_string()));
    }
}
