//! arborist CLI - Clean up git branches that are merged or gone

mod cli;
mod colors;
mod commands;
mod interaction;
mod output;
mod report;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::ConfigCommands;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Route diagnostics to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "arborist=debug,arborist_core=debug"
    } else {
        "error"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Some(Commands::Clean(args)) => {
            commands::run_clean(args, config_path, cli.json, cli.quiet)
        }
        Some(Commands::Status(args)) => {
            commands::run_status(args, config_path, cli.json, cli.quiet)
        }
        Some(Commands::Config(config_cmd)) => match config_cmd {
            ConfigCommands::Show => commands::run_config_show(config_path, cli.json, cli.quiet),
            ConfigCommands::Init { force } => {
                commands::run_config_init(config_path, force, cli.json, cli.quiet)
            }
        },
        None => {
            // No subcommand - print version info
            if !cli.quiet {
                println!("arborist v{}", env!("CARGO_PKG_VERSION"));
                println!("Use --help for usage information");
            }
            Ok(0)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
