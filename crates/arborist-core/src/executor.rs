//! Cleanup execution
//!
//! Applies a [`CleanupPlan`] through a [`RepositoryPort`], one entry at a time
//! and in plan order. A failing entry is recorded and the run moves on; only a
//! plan that fails the safety check stops execution before anything happens.

use chrono::Utc;
use tracing::{info, warn};

use crate::config::CleanupConfig;
use crate::error::ArboristError;
use crate::interaction::{Answer, CancellationToken, ConfirmationPort};
use crate::planner::verify;
use crate::repository::RepositoryPort;
use crate::types::{
    CleanupPlan, DeleteMode, MaintenanceOutcome, Outcome, OutcomeResult, PlanEntry, RunStatus,
    RunSummary, StepResult,
};

/// Maintenance steps run after branch deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceStep {
    /// Remote-tracking ref prune
    Prune,
    /// Garbage collection
    GarbageCollect,
}

impl MaintenanceStep {
    pub fn description(&self) -> &'static str {
        match self {
            MaintenanceStep::Prune => "Pruning remote-tracking branches",
            MaintenanceStep::GarbageCollect => "Running garbage collection",
        }
    }
}

/// Receives progress while a plan executes
pub trait CleanupObserver {
    /// An entry reached its final state
    fn on_outcome(&self, _outcome: &Outcome) {}

    /// A maintenance step is about to run
    fn on_maintenance_start(&self, _step: MaintenanceStep) {}

    /// A maintenance step finished
    fn on_maintenance_end(&self, _step: MaintenanceStep, _result: &StepResult) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CleanupObserver for NoopObserver {}

/// Per-run execution switches
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Compute hypothetical outcomes without touching the repository
    pub dry_run: bool,
    /// Checked between entries
    pub cancel: CancellationToken,
}

impl ExecuteOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }
}

/// Execute with a no-op observer
pub fn execute(
    plan: &CleanupPlan,
    config: &CleanupConfig,
    repo: &dyn RepositoryPort,
    confirm: &dyn ConfirmationPort,
    options: &ExecuteOptions,
) -> Result<RunSummary, ArboristError> {
    execute_with_observer(plan, config, repo, confirm, options, &NoopObserver)
}

/// Execute a plan, reporting progress to `observer`.
///
/// In dry-run mode neither the confirmation port nor any mutating repository
/// call is used. Otherwise, when `config.interactive` is set, the plan as a
/// whole and then each entry are confirmed first; declining an entry skips it,
/// `Quit` interrupts the run. Prune and gc run afterwards unless
/// `config.skip_gc` is set or the run was interrupted. A cancellation seen at
/// any point before gc marks the run interrupted and skips what is left.
///
/// A failed maintenance step makes the status `CompletedWithFailures`, just
/// like a failed deletion.
pub fn execute_with_observer(
    plan: &CleanupPlan,
    config: &CleanupConfig,
    repo: &dyn RepositoryPort,
    confirm: &dyn ConfirmationPort,
    options: &ExecuteOptions,
    observer: &dyn CleanupObserver,
) -> Result<RunSummary, ArboristError> {
    config.validate()?;
    verify(plan, config)?;

    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(plan.len());
    let mut interrupted = false;
    let mut decline_all = false;

    if !options.dry_run && config.interactive && !plan.is_empty() {
        match confirm.confirm_plan(plan) {
            Answer::Yes => {}
            Answer::No => decline_all = true,
            Answer::Quit => interrupted = true,
        }
    }

    if !interrupted {
        for entry in plan.entries() {
            if options.cancel.is_cancelled() {
                info!("cleanup interrupted");
                interrupted = true;
                break;
            }

            let result = if options.dry_run {
                OutcomeResult::WouldDelete
            } else if decline_all {
                OutcomeResult::SkippedByUser
            } else {
                match ask(config, confirm, entry) {
                    Answer::Yes => delete_entry(repo, entry),
                    Answer::No => OutcomeResult::SkippedByUser,
                    Answer::Quit => {
                        info!(branch = %entry.branch, "cleanup stopped at user request");
                        interrupted = true;
                        break;
                    }
                }
            };

            let outcome = Outcome {
                branch: entry.branch.clone(),
                reason: entry.reason,
                result,
            };
            observer.on_outcome(&outcome);
            outcomes.push(outcome);
        }
    }

    // A request that arrived during the last entry still stops the run.
    if options.cancel.is_cancelled() {
        interrupted = true;
    }

    let maintenance = if options.dry_run || interrupted || config.skip_gc {
        MaintenanceOutcome::skipped()
    } else {
        run_maintenance(repo, observer, &options.cancel)
    };
    if options.cancel.is_cancelled() {
        interrupted = true;
    }

    let unprocessed = plan.len() - outcomes.len();
    let failed = outcomes
        .iter()
        .any(|o| matches!(o.result, OutcomeResult::Failed(_)))
        || maintenance.prune.is_failed()
        || maintenance.gc.is_failed();
    let status = if interrupted {
        RunStatus::Interrupted
    } else if failed {
        RunStatus::CompletedWithFailures
    } else if plan.is_empty() {
        RunStatus::NothingToDo
    } else {
        RunStatus::Completed
    };

    Ok(RunSummary {
        status,
        dry_run: options.dry_run,
        outcomes,
        unprocessed,
        maintenance,
        reflog_expiry: config.reflog_expiry.clone(),
        started_at,
        finished_at: Utc::now(),
    })
}

fn ask(config: &CleanupConfig, confirm: &dyn ConfirmationPort, entry: &PlanEntry) -> Answer {
    if config.interactive {
        confirm.ask(&entry.branch, entry.reason)
    } else {
        Answer::Yes
    }
}

fn delete_entry(repo: &dyn RepositoryPort, entry: &PlanEntry) -> OutcomeResult {
    match repo.delete_branch(&entry.branch, DeleteMode::from(entry.reason)) {
        Ok(()) => {
            info!(branch = %entry.branch, reason = %entry.reason, "deleted branch");
            OutcomeResult::Deleted
        }
        Err(e) => {
            warn!(branch = %entry.branch, error = %e, "failed to delete branch");
            OutcomeResult::Failed(e.to_string())
        }
    }
}

fn run_step(
    step: MaintenanceStep,
    observer: &dyn CleanupObserver,
    f: impl FnOnce() -> Result<(), ArboristError>,
) -> StepResult {
    observer.on_maintenance_start(step);
    let result = match f() {
        Ok(()) => StepResult::Ok,
        Err(e) => {
            warn!(step = step.description(), error = %e, "maintenance step failed");
            StepResult::Failed(e.to_string())
        }
    };
    observer.on_maintenance_end(step, &result);
    result
}

fn run_maintenance(
    repo: &dyn RepositoryPort,
    observer: &dyn CleanupObserver,
    cancel: &CancellationToken,
) -> MaintenanceOutcome {
    let prune = run_step(MaintenanceStep::Prune, observer, || {
        repo.prune_remote_tracking()
    });
    if cancel.is_cancelled() {
        info!("cleanup interrupted before garbage collection");
        return MaintenanceOutcome {
            prune,
            gc: StepResult::Skipped,
        };
    }
    let gc = run_step(MaintenanceStep::GarbageCollect, observer, || {
        repo.garbage_collect()
    });
    MaintenanceOutcome { prune, gc }
}
