//! Implementation of the `arborist status` command

use std::path::Path;

use arborist_core::{ClassifiedBranch, GitCli, UpstreamState, classify_all, collect_snapshots};
use owo_colors::OwoColorize;

use super::load_settings;
use crate::cli::SelectionArgs;
use crate::colors::COLORS;
use crate::interaction::print_warning;
use crate::output::{JsonIssue, JsonResponse, StatusData, report_error};
use crate::settings;

fn upstream_label(state: UpstreamState) -> &'static str {
    match state {
        UpstreamState::NoUpstream => "-",
        UpstreamState::TrackingOk => "tracking",
        UpstreamState::TrackingGone => "gone",
    }
}

/// One table row, without colors
fn branch_row(branch: &ClassifiedBranch) -> String {
    let marker = if branch.snapshot.is_current { "*" } else { " " };
    let mut row = format!(
        "{} {:<40} {:<10} {}",
        marker,
        branch.snapshot.name,
        branch.disposition.as_str(),
        upstream_label(branch.snapshot.upstream_state)
    );
    if !branch.snapshot.status_known {
        row.push_str("  (merge status unknown)");
    }
    row
}

/// Run the status command
pub fn run_status(
    args: SelectionArgs,
    config_path: Option<&Path>,
    json_output: bool,
    quiet: bool,
) -> Result<i32, String> {
    let (_, file_config) = match load_settings::<StatusData>("status", config_path, json_output) {
        Ok(loaded) => loaded,
        Err(code) => return Ok(code),
    };
    let mut config = file_config.cleanup;
    settings::apply_selection(&args, &mut config);
    if let Err(e) = config.validate() {
        return Ok(report_error("status", StatusData::default(), &e, json_output));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| format!("failed to read current directory: {}", e))?;
    let repo = match GitCli::discover(&cwd, config.git_timeout()) {
        Ok(repo) => repo,
        Err(e) => return Ok(report_error("status", StatusData::default(), &e, json_output)),
    };

    let mut data = StatusData {
        repository: repo.repo_root().display().to_string(),
        reference_branch: config.reference_branch.clone(),
        protected: config.effective_protected().into_iter().collect(),
        branches: vec![],
    };

    let set = match collect_snapshots(&repo, &config) {
        Ok(set) => set,
        Err(e) => return Ok(report_error("status", data, &e, json_output)),
    };
    data.branches = classify_all(&set.snapshots, &config);

    if json_output {
        let issues = set.warnings.iter().map(JsonIssue::from).collect();
        JsonResponse::ok_with_issues("status", data, issues).print();
        return Ok(0);
    }
    if quiet {
        return Ok(0);
    }

    for warning in &set.warnings {
        print_warning(&format!("{}: {}", warning.branch, warning.message));
    }

    println!(
        "{} {}",
        "Reference branch:".style(COLORS.active).bold(),
        data.reference_branch
    );
    println!();
    for branch in &data.branches {
        let style = COLORS.disposition(branch.disposition);
        println!("{}", branch_row(branch).style(style));
    }

    let deletable = data
        .branches
        .iter()
        .filter(|b| b.disposition.delete_reason().is_some())
        .count();
    println!();
    match deletable {
        0 => println!("Nothing to clean up."),
        1 => println!("1 branch can be deleted. Run `arborist clean` to remove it."),
        n => println!("{} branches can be deleted. Run `arborist clean` to remove them.", n),
    }

    Ok(0)
}
