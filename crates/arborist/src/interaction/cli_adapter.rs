//! Terminal confirmation using dialoguer prompts
//!
//! This module provides `TerminalConfirmation`, which implements
//! `ConfirmationPort` for interactive cleanup, plus the Ctrl+C handler and
//! progress spinners used by the commands.

use std::fmt::Write as FmtWrite;
use std::io::{IsTerminal, Write};
use std::sync::OnceLock;
use std::time::Duration;

use arborist_core::{
    Answer, ArboristError, CancellationToken, CleanupPlan, ConfirmationPort, DeleteReason,
};
use console::Style;
use dialoguer::Confirm;
use dialoguer::theme::Theme;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Token cancelled by the first Ctrl+C
static CANCEL: OnceLock<CancellationToken> = OnceLock::new();

/// Set up the global Ctrl+C handler and return its cancellation token.
///
/// The first Ctrl+C lets the branch in progress finish and stops before the
/// next one; a second Ctrl+C exits immediately.
pub fn setup_ctrl_c_handler() -> CancellationToken {
    CANCEL
        .get_or_init(|| {
            let token = CancellationToken::new();
            let handler_token = token.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                if handler_token.is_cancelled() {
                    std::process::exit(130);
                }
                handler_token.cancel();
                eprintln!();
            }) {
                eprintln!("Warning: Could not set Ctrl+C handler: {}", e);
            }
            token
        })
        .clone()
}

/// Confirm-prompt theme with a `?` marker and dim hints
struct SpacedTheme {
    prompt_style: Style,
    active_style: Style,
    hint_style: Style,
}

impl SpacedTheme {
    fn new() -> Self {
        Self {
            prompt_style: Style::new().cyan().bold(),
            active_style: Style::new().cyan(),
            hint_style: Style::new().dim(),
        }
    }
}

impl Theme for SpacedTheme {
    fn format_prompt(&self, f: &mut dyn FmtWrite, prompt: &str) -> std::fmt::Result {
        write!(f, "{}", self.prompt_style.apply_to(format!("? {}", prompt)))
    }

    fn format_confirm_prompt(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        default: Option<bool>,
    ) -> std::fmt::Result {
        let hint = match default {
            Some(true) => "(Y/n)",
            Some(false) => "(y/N)",
            None => "(y/n)",
        };
        write!(
            f,
            "{} {}",
            self.prompt_style.apply_to(format!("? {}", prompt)),
            self.hint_style.apply_to(hint)
        )
    }

    fn format_confirm_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        selection: Option<bool>,
    ) -> std::fmt::Result {
        let answer = match selection {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "Quit",
        };
        write!(
            f,
            "{} {}",
            self.prompt_style.apply_to(format!("? {}", prompt)),
            self.active_style.apply_to(answer)
        )
    }
}

/// Confirmation port backed by terminal prompts
pub struct TerminalConfirmation {
    is_tty: bool,
    cancel: CancellationToken,
}

impl TerminalConfirmation {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            is_tty: std::io::stdin().is_terminal(),
            cancel,
        }
    }

    #[allow(dead_code)]
    pub fn with_tty(is_tty: bool, cancel: CancellationToken) -> Self {
        Self { is_tty, cancel }
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Fail early when prompts cannot be shown
    pub fn require_tty(&self) -> Result<(), ArboristError> {
        if self.is_tty {
            Ok(())
        } else {
            Err(ArboristError::NonInteractiveTerminal)
        }
    }

    /// Ask a yes/no question. Esc, `q`, Ctrl+C and I/O errors all mean quit.
    fn confirm(&self, prompt: &str) -> Answer {
        if !self.is_tty || self.cancel.is_cancelled() {
            return Answer::Quit;
        }

        let theme = SpacedTheme::new();
        let answer = match Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
        {
            Ok(Some(true)) => Answer::Yes,
            Ok(Some(false)) => Answer::No,
            Ok(None) | Err(_) => Answer::Quit,
        };

        if self.cancel.is_cancelled() {
            Answer::Quit
        } else {
            answer
        }
    }
}

impl ConfirmationPort for TerminalConfirmation {
    fn ask(&self, branch: &str, reason: DeleteReason) -> Answer {
        self.confirm(&format!("Delete branch '{}' ({})?", branch, reason))
    }

    fn confirm_plan(&self, plan: &CleanupPlan) -> Answer {
        self.confirm(&format!(
            "Delete {} {} ({} merged, {} gone)?",
            plan.len(),
            if plan.len() == 1 { "branch" } else { "branches" },
            plan.count(DeleteReason::Merged),
            plan.count(DeleteReason::Gone)
        ))
    }
}

/// Spinner for a long-running git step
pub struct Spinner {
    bar: ProgressBar,
    message: String,
    visible: bool,
}

impl Spinner {
    /// Start a spinner; an invisible spinner prints nothing at all
    pub fn start(message: &str, visible: bool) -> Self {
        let bar = if visible {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg} [{elapsed}]")
                    .expect("valid template")
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            message: message.to_string(),
            visible,
        }
    }

    /// Replace the spinner with a ✓ or ✗ line
    pub fn finish(self, success: bool) {
        let elapsed_str = format!("{:.1}s", self.bar.elapsed().as_secs_f64());
        self.bar.finish_and_clear();
        if !self.visible {
            return;
        }
        if success {
            println!("{} {} [{}]", "✓".green(), self.message.green(), elapsed_str);
        } else {
            println!("{} {} [{}]", "✗".red(), self.message.red(), elapsed_str);
        }
    }
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    let _ = std::io::stderr().flush();
}
