//! CLI interaction module
//!
//! This module provides `TerminalConfirmation`, the dialoguer-backed
//! implementation of the `ConfirmationPort` trait, along with Ctrl+C handling
//! and progress spinners.

mod cli_adapter;

pub use cli_adapter::{Spinner, TerminalConfirmation, print_warning, setup_ctrl_c_handler};
