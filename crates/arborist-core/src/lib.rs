//! arborist-core: branch classification, cleanup planning, and execution
//!
//! This crate decides which local branches are safe to delete and deletes
//! them through a [`RepositoryPort`], never touching the current branch or a
//! protected branch.

/// Core error types for arborist operations
pub mod error;

/// Configuration handling
pub mod config;

/// Core data types (BranchSnapshot, Disposition, CleanupPlan, RunSummary, etc.)
pub mod types;

/// Per-branch classification
pub mod classifier;

/// Snapshot collection and plan building
pub mod planner;

/// Plan execution
pub mod executor;

/// Repository access port
pub mod repository;

/// Confirmation port and cancellation
pub mod interaction;

/// Git command-line adapter
pub mod git;

// Re-exports for convenience
pub use classifier::{ClassifiedBranch, classify, classify_all};
pub use config::{CleanupConfig, Config};
pub use error::ArboristError;
pub use executor::{
    CleanupObserver, ExecuteOptions, MaintenanceStep, NoopObserver, execute,
    execute_with_observer,
};
pub use git::GitCli;
pub use interaction::{Answer, CancellationToken, ConfirmationPort, ScriptedConfirmation};
pub use planner::{SnapshotSet, SnapshotWarning, collect_snapshots, plan, verify};
pub use repository::{RawBranch, RepositoryPort};
pub use types::{
    BranchSnapshot, CleanupPlan, DeleteMode, DeleteReason, Disposition, MaintenanceOutcome,
    Outcome, OutcomeResult, PlanEntry, RunStatus, RunSummary, StepResult, UpstreamState,
};
