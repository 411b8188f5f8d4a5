//! Human-readable rendering of plans, progress, and run summaries

use std::cell::RefCell;

use arborist_core::{
    CleanupObserver, CleanupPlan, DeleteReason, MaintenanceStep, Outcome, OutcomeResult,
    RunStatus, RunSummary, StepResult,
};
use owo_colors::OwoColorize;

use crate::colors::COLORS;
use crate::interaction::Spinner;

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

/// Line printed for a finished plan entry
pub fn outcome_line(outcome: &Outcome) -> String {
    let (marker, text) = match &outcome.result {
        OutcomeResult::Deleted => ("✓", format!("deleted {} ({})", outcome.branch, outcome.reason)),
        OutcomeResult::WouldDelete => (
            "•",
            format!("would delete {} ({})", outcome.branch, outcome.reason),
        ),
        OutcomeResult::SkippedByUser => ("-", format!("skipped {}", outcome.branch)),
        OutcomeResult::Failed(detail) => (
            "✗",
            format!("failed to delete {}: {}", outcome.branch, detail),
        ),
    };
    format!("{} {}", marker, text)
}

/// Streams outcomes and maintenance progress to the terminal
pub struct TextReporter {
    visible: bool,
    spinner: RefCell<Option<Spinner>>,
}

impl TextReporter {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            spinner: RefCell::new(None),
        }
    }
}

impl CleanupObserver for TextReporter {
    fn on_outcome(&self, outcome: &Outcome) {
        if self.visible {
            let style = COLORS.outcome(&outcome.result);
            println!("{}", outcome_line(outcome).style(style));
        }
    }

    fn on_maintenance_start(&self, step: MaintenanceStep) {
        let spinner = Spinner::start(step.description(), self.visible);
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn on_maintenance_end(&self, _step: MaintenanceStep, result: &StepResult) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish(!result.is_failed());
        }
        if let StepResult::Failed(detail) = result {
            if self.visible {
                println!("  {}", detail.style(COLORS.fail));
            }
        }
    }
}

/// Print the plan before execution starts
pub fn print_plan(plan: &CleanupPlan, dry_run: bool) {
    if plan.is_empty() {
        println!("No branches to clean up.");
        return;
    }

    let verb = if dry_run { "would be deleted" } else { "to delete" };
    let header = format!(
        "{} {} ({} merged, {} gone):",
        plural(plan.len(), "branch", "branches"),
        verb,
        plan.count(DeleteReason::Merged),
        plan.count(DeleteReason::Gone)
    );
    println!("{}", header.style(COLORS.active).bold());
    for entry in plan.entries() {
        println!("  {:<40} {}", entry.branch, entry.reason);
    }
    println!();
}

/// Closing lines after execution
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let interrupted = (summary.status == RunStatus::Interrupted).then(|| {
        format!(
            "Interrupted: {} not processed.",
            plural(summary.unprocessed, "branch", "branches")
        )
    });

    if summary.dry_run {
        if summary.would_delete() > 0 {
            lines.push(format!(
                "Dry run: {} would be deleted. Nothing was changed.",
                plural(summary.would_delete(), "branch", "branches")
            ));
        }
        lines.extend(interrupted);
        return lines;
    }

    if summary.status != RunStatus::NothingToDo {
        lines.push(format!(
            "Deleted {}, skipped {}, failed {}.",
            summary.deleted(),
            summary.skipped(),
            summary.failed()
        ));
    }
    lines.extend(interrupted);
    if summary.deleted() > 0 {
        lines.push(format!(
            "Deleted branches can be recovered from the reflog for {}.",
            summary.reflog_expiry
        ));
    }
    lines
}

pub fn print_summary(summary: &RunSummary) {
    let style = if summary.status == RunStatus::Interrupted || summary.has_failures() {
        COLORS.warning
    } else {
        COLORS.success
    };
    for line in summary_lines(summary) {
        println!("{}", line.style(style));
    }
}
