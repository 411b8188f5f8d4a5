//! Confirmation port and cancellation
//!
//! Interactive mode asks a [`ConfirmationPort`] before each deletion. The
//! terminal implementation lives in the CLI crate; [`ScriptedConfirmation`]
//! answers from a fixed script for tests and automation.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::types::{CleanupPlan, DeleteReason};

/// Reply to a confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Go ahead
    Yes,
    /// Skip this branch
    No,
    /// Stop the run
    Quit,
}

/// Asks the user before destructive actions
pub trait ConfirmationPort {
    /// Confirm deleting one branch
    fn ask(&self, branch: &str, reason: DeleteReason) -> Answer;

    /// Confirm the plan as a whole before any per-branch question
    fn confirm_plan(&self, _plan: &CleanupPlan) -> Answer {
        Answer::Yes
    }
}

/// Confirmation double that replays scripted answers.
///
/// Once the script runs out every further question is answered with the
/// fallback answer.
#[derive(Debug)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<Answer>>,
    fallback: Answer,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn new(answers: impl IntoIterator<Item = Answer>, fallback: Answer) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Answer every question with `answer`
    pub fn always(answer: Answer) -> Self {
        Self::new([], answer)
    }

    /// Branches asked about, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl ConfirmationPort for ScriptedConfirmation {
    fn ask(&self, branch: &str, _reason: DeleteReason) -> Answer {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(branch.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.fallback)
    }
}

/// Cooperative cancellation flag checked between plan entries
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous request
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
