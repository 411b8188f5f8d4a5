//! JSON output formatting

use arborist_core::{
    ArboristError, ClassifiedBranch, CleanupConfig, PlanEntry, RunSummary, SnapshotWarning,
};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: &str = "1";

/// Code attached to branches whose merge status could not be determined
const UNKNOWN_STATUS_CODE: &str = "W001";

/// JSON response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for forward compatibility
    pub schema_version: String,
    /// Command that generated this response
    pub command: String,
    /// Status: "ok" or "error"
    pub status: String,
    /// Command-specific payload
    pub data: T,
    /// Warnings and errors
    pub issues: Vec<JsonIssue>,
}

impl<T> JsonResponse<T> {
    /// Create a successful response
    pub fn ok(command: &str, data: T) -> Self {
        Self::ok_with_issues(command, data, vec![])
    }

    /// Create a successful response with issues
    pub fn ok_with_issues(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "ok".to_string(),
            data,
            issues,
        }
    }

    /// Create an error response
    pub fn error(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "error".to_string(),
            data,
            issues,
        }
    }
}

impl<T: Serialize> JsonResponse<T> {
    /// Write the response to stdout
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: failed to serialize response: {}", e),
        }
    }
}

/// Issue object structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonIssue {
    /// Error/warning code (e.g., "E012")
    pub code: String,
    /// Severity level
    pub severity: String,
    /// Human-readable message
    pub message: String,
    /// Branch the issue concerns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl JsonIssue {
    /// Error issue from an arborist error
    pub fn from_error(err: &ArboristError) -> Self {
        let branch = match err {
            ArboristError::PlanInvariant { branch, .. } => Some(branch.clone()),
            _ => None,
        };
        Self {
            code: err.code().to_string(),
            severity: "error".to_string(),
            message: err.to_string(),
            branch,
        }
    }

    /// Downgrade to a warning for problems the run recovered from
    pub fn as_warning(mut self) -> Self {
        self.severity = "warning".to_string();
        self
    }
}

impl From<&SnapshotWarning> for JsonIssue {
    fn from(warning: &SnapshotWarning) -> Self {
        Self {
            code: UNKNOWN_STATUS_CODE.to_string(),
            severity: "warning".to_string(),
            message: warning.message.clone(),
            branch: Some(warning.branch.clone()),
        }
    }
}

/// Print a failure in the requested format and return its exit code
pub fn report_error<T: Serialize>(command: &str, data: T, err: &ArboristError, json: bool) -> i32 {
    if json {
        JsonResponse::error(command, data, vec![JsonIssue::from_error(err)]).print();
    } else {
        eprintln!("error: {}", err);
    }
    err.exit_code()
}

/// Data payload for clean command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanData {
    /// Repository root
    pub repository: String,
    /// Merge baseline
    pub reference_branch: String,
    /// Planned deletions in execution order
    pub plan: Vec<PlanEntry>,
    /// Execution result, absent when the run failed before executing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

/// Data payload for status command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusData {
    /// Repository root
    pub repository: String,
    /// Merge baseline
    pub reference_branch: String,
    /// Protected entries as evaluated, including the reference branch
    pub protected: Vec<String>,
    /// Every local branch with its disposition
    pub branches: Vec<ClassifiedBranch>,
}

/// Data payload for config commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    /// Configuration file path
    pub path: String,
    /// Whether the file exists on disk
    pub exists: bool,
    /// Whether this invocation wrote the file
    pub written: bool,
    /// Effective cleanup settings
    pub cleanup: CleanupConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let response = JsonResponse::ok("status", StatusData::default());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["schema_version"], "1");
        assert_eq!(json["command"], "status");
        assert_eq!(json["status"], "ok");
        assert!(json["issues"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_error_issue_from_plan_invariant() {
        let err = ArboristError::PlanInvariant {
            branch: "main".to_string(),
            reason: "branch is protected".to_string(),
        };
        let issue = JsonIssue::from_error(&err);
        assert_eq!(issue.code, "E020");
        assert_eq!(issue.severity, "error");
        assert_eq!(issue.branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_warning_issue() {
        let warning = SnapshotWarning {
            branch: "odd".to_string(),
            message: "merge status unknown".to_string(),
        };
        let issue = JsonIssue::from(&warning);
        assert_eq!(issue.code, "W001");
        assert_eq!(issue.severity, "warning");

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["branch"], "odd");
    }

    #[test]
    fn test_clean_data_omits_missing_summary() {
        let json = serde_json::to_value(CleanData::default()).unwrap();
        assert!(json.get("summary").is_none());
        assert!(json["plan"].as_array().unwrap().is_empty());
    }
}
