//! CLI command implementations

pub mod clean;
pub mod config;
pub mod status;

use std::path::{Path, PathBuf};

use arborist_core::{ArboristError, Config};
use serde::Serialize;

pub use clean::run_clean;
pub use config::{ConfigCommands, run_config_init, run_config_show};
pub use status::run_status;

use crate::output::{JsonIssue, JsonResponse};
use crate::settings;

/// Exit code for a run that completed with failures
pub const EXIT_FAILURES: i32 = 1;

/// Exit code for configuration problems outside the core error type
pub const EXIT_CONFIG: i32 = 4;

/// Exit code for an interrupted run
pub const EXIT_INTERRUPTED: i32 = 130;

/// Load settings, reporting a failure as a configuration error.
///
/// On failure the error has already been printed and the exit code is returned.
fn load_settings<T: Serialize + Default>(
    command: &str,
    config_path: Option<&Path>,
    json_output: bool,
) -> Result<(PathBuf, Config), i32> {
    settings::load(config_path).map_err(|err| {
        let message = format!("{:#}", err);
        if json_output {
            let code = err
                .downcast_ref::<ArboristError>()
                .map_or("E001", ArboristError::code);
            let issue = JsonIssue {
                code: code.to_string(),
                severity: "error".to_string(),
                message,
                branch: None,
            };
            JsonResponse::error(command, T::default(), vec![issue]).print();
        } else {
            eprintln!("error: {}", message);
        }
        EXIT_CONFIG
    })
}
