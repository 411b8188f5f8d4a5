//! Implementation of the `arborist clean` command

use std::path::Path;

use arborist_core::{
    ExecuteOptions, GitCli, RepositoryPort, RunStatus, RunSummary, collect_snapshots,
    execute_with_observer, plan,
};
use tracing::{debug, warn};

use super::{EXIT_FAILURES, EXIT_INTERRUPTED, load_settings};
use crate::cli::CleanArgs;
use crate::interaction::{Spinner, TerminalConfirmation, print_warning, setup_ctrl_c_handler};
use crate::output::{CleanData, JsonIssue, JsonResponse, report_error};
use crate::report::{self, TextReporter};
use crate::settings;

/// Exit code for a finished run
pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.status == RunStatus::Interrupted {
        EXIT_INTERRUPTED
    } else if summary.has_failures() {
        EXIT_FAILURES
    } else {
        0
    }
}

/// Run the clean command
pub fn run_clean(
    args: CleanArgs,
    config_path: Option<&Path>,
    json_output: bool,
    quiet: bool,
) -> Result<i32, String> {
    let (_, file_config) = match load_settings::<CleanData>("clean", config_path, json_output) {
        Ok(loaded) => loaded,
        Err(code) => return Ok(code),
    };
    let mut config = file_config.cleanup;
    let dry_run = settings::apply_clean(&args, &mut config);
    if let Err(e) = config.validate() {
        return Ok(report_error("clean", CleanData::default(), &e, json_output));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| format!("failed to read current directory: {}", e))?;
    let repo = match GitCli::discover(&cwd, config.git_timeout()) {
        Ok(repo) => repo,
        Err(e) => return Ok(report_error("clean", CleanData::default(), &e, json_output)),
    };

    let mut data = CleanData {
        repository: repo.repo_root().display().to_string(),
        reference_branch: config.reference_branch.clone(),
        ..CleanData::default()
    };

    let cancel = setup_ctrl_c_handler();
    let confirm = TerminalConfirmation::new(cancel.clone());
    if config.interactive && !dry_run {
        if let Err(e) = confirm.require_tty() {
            return Ok(report_error("clean", data, &e, json_output));
        }
    }

    let show_text = !json_output && !quiet;
    let mut issues = Vec::new();

    if config.fetch_before_clean && !dry_run {
        let spinner = Spinner::start("Fetching from remotes", show_text);
        match repo.fetch_prune() {
            Ok(()) => spinner.finish(true),
            Err(e) => {
                spinner.finish(false);
                warn!(error = %e, "fetch failed, continuing with local state");
                if show_text {
                    print_warning(&format!("fetch failed, using local state: {}", e));
                }
                issues.push(JsonIssue::from_error(&e).as_warning());
            }
        }
    }

    let set = match collect_snapshots(&repo, &config) {
        Ok(set) => set,
        Err(e) => return Ok(report_error("clean", data, &e, json_output)),
    };
    for warning in &set.warnings {
        if show_text {
            print_warning(&format!("{}: {}", warning.branch, warning.message));
        }
        issues.push(JsonIssue::from(warning));
    }

    let plan = match plan(&set.snapshots, &config) {
        Ok(plan) => plan,
        Err(e) => return Ok(report_error("clean", data, &e, json_output)),
    };
    debug!(entries = plan.len(), dry_run, "cleanup plan ready");
    data.plan = plan.entries().to_vec();

    if show_text {
        report::print_plan(&plan, dry_run);
    }

    let reporter = TextReporter::new(show_text);
    let options = ExecuteOptions { dry_run, cancel };
    let summary = match execute_with_observer(&plan, &config, &repo, &confirm, &options, &reporter)
    {
        Ok(summary) => summary,
        Err(e) => return Ok(report_error("clean", data, &e, json_output)),
    };

    let code = exit_code(&summary);
    if json_output {
        data.summary = Some(summary);
        JsonResponse::ok_with_issues("clean", data, issues).print();
    } else if !quiet {
        report::print_summary(&summary);
    }

    Ok(code)
}
