//! Error types for arborist operations

use thiserror::Error;

/// Core error type for arborist operations
#[derive(Error, Debug)]
pub enum ArboristError {
    // === Configuration errors (E001-E003) ===
    /// E001: Configuration is inconsistent or incomplete
    #[error("E001: configuration error: {0}")]
    Config(String),

    /// E002: Configuration file could not be parsed
    #[error("E002: invalid configuration file {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    /// E003: Interactive mode was requested without a terminal
    #[error("E003: interactive mode requires a terminal (use --no-interactive)")]
    NonInteractiveTerminal,

    // === Repository errors (E010-E014) ===
    /// E010: Working directory is not inside a git work tree
    #[error("E010: not a git repository")]
    NotAGitRepository,

    /// E011: git could not be executed at all
    #[error("E011: failed to run git: {reason}")]
    GitUnavailable { reason: String },

    /// E012: git exited with a failure status
    #[error("E012: git {command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    /// E013: git did not finish within the configured timeout
    #[error("E013: git {command} timed out after {secs} seconds")]
    GitTimeout { command: String, secs: u64 },

    /// E014: git produced output that could not be understood
    #[error("E014: unexpected git output from {command}: {detail}")]
    GitOutput { command: String, detail: String },

    // === Safety errors (E020) ===
    /// E020: A cleanup plan violated a safety invariant
    #[error("E020: internal consistency violation for branch {branch}: {reason}")]
    PlanInvariant { branch: String, reason: String },

    // === IO errors ===
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArboristError {
    /// Get the error code (e.g., "E001", "E012")
    pub fn code(&self) -> &'static str {
        match self {
            ArboristError::Config(_) => "E001",
            ArboristError::ConfigParse { .. } => "E002",
            ArboristError::NonInteractiveTerminal => "E003",
            ArboristError::NotAGitRepository => "E010",
            ArboristError::GitUnavailable { .. } => "E011",
            ArboristError::GitCommand { .. } => "E012",
            ArboristError::GitTimeout { .. } => "E013",
            ArboristError::GitOutput { .. } => "E014",
            ArboristError::PlanInvariant { .. } => "E020",
            ArboristError::Io(_) => "E030",
        }
    }

    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            ArboristError::Config(_)
            | ArboristError::ConfigParse { .. }
            | ArboristError::NonInteractiveTerminal => 4, // Configuration errors

            ArboristError::NotAGitRepository => 5,

            ArboristError::GitUnavailable { .. }
            | ArboristError::GitCommand { .. }
            | ArboristError::GitTimeout { .. }
            | ArboristError::GitOutput { .. }
            | ArboristError::Io(_) => 2, // Git and IO errors

            ArboristError::PlanInvariant { .. } => 70, // Internal software error
        }
    }

    /// Whether this error must stop a run rather than degrade to a recorded outcome
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ArboristError::Config(_)
                | ArboristError::ConfigParse { .. }
                | ArboristError::NonInteractiveTerminal
                | ArboristError::NotAGitRepository
                | ArboristError::PlanInvariant { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ArboristError::Config("reference branch must not be empty".to_string());
        assert_eq!(err.code(), "E001");
        assert_eq!(err.exit_code(), 4);
        assert!(err.is_fatal());

        let err = ArboristError::NotAGitRepository;
        assert_eq!(err.code(), "E010");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_error_display() {
        let err = ArboristError::GitCommand {
            command: "branch -d feature/x".to_string(),
            stderr: "error: branch 'feature/x' not found.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "E012: git branch -d feature/x failed: error: branch 'feature/x' not found."
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_timeout_error() {
        let err = ArboristError::GitTimeout {
            command: "gc".to_string(),
            secs: 30,
        };
        assert_eq!(err.code(), "E013");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("30 seconds"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_plan_invariant_error() {
        let err = ArboristError::PlanInvariant {
            branch: "main".to_string(),
            reason: "branch is protected".to_string(),
        };
        assert_eq!(err.code(), "E020");
        assert_eq!(err.exit_code(), 70);
        assert!(err.is_fatal());
        assert!(err.to_string().contains("internal consistency"));
    }
}
