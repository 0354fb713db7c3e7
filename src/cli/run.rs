//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Initialises tracing
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;
use tracing::debug;

use p4stream_config::{CliArgs, Config};
use p4stream_utils::error::{ConfigError, P4StreamError};
use p4stream_utils::exit_codes::ExitCode;
use p4stream_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;

/// Main CLI execution function.
///
/// Prints all output, including errors. Returns the exit code to use on
/// failure; main.rs only calls `std::process::exit`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    let cli_args = cli_args_from(&cli);

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => return Err(report_config_error(err)),
    };

    if let Err(e) = init_tracing(config.verbose()) {
        eprintln!("warning: failed to initialise logging: {e}");
    }

    let json = config.json_output();
    debug!(
        port = config.port().unwrap_or("<p4 default>"),
        user = config.user().unwrap_or("<p4 default>"),
        p4_bin = config.p4_bin(),
        "configuration resolved"
    );
    let result = match cli.command {
        Commands::List => commands::execute_list_command(&config, json),
        Commands::Show { path } => commands::execute_show_command(&path, &config, json),
        Commands::Create {
            path,
            name,
            kind,
            parent,
            populate,
            options,
            owner,
            dry_run,
        } => {
            let args = commands::CreateArgs {
                path,
                name,
                kind,
                parent,
                populate,
                options,
                owner,
                dry_run,
            };
            commands::execute_create_command(&args, &config, json)
        }
        Commands::Delete {
            path,
            prune,
            yes: _,
            dry_run,
        } => commands::execute_delete_command(&path, prune, dry_run, &config, json),
        Commands::Config => commands::execute_config_command(&config, json),
    };

    if let Err(error) = result {
        debug!(error = ?error, "command failed");
        eprintln!("{}", error.display_for_user());
        return Err(error.to_exit_code());
    }

    Ok(())
}

pub(crate) fn cli_args_from(cli: &Cli) -> CliArgs {
    CliArgs {
        config_path: cli.config.clone(),
        port: cli.port.clone(),
        user: cli.user.clone(),
        client: cli.client.clone(),
        p4_bin: cli.p4_bin.clone(),
        command_timeout: cli.timeout,
        verbose: Some(cli.verbose),
        output_format: cli.json.then(|| "json".to_string()),
    }
}

/// Print a configuration failure and pick its exit code.
fn report_config_error(err: anyhow::Error) -> ExitCode {
    let err = match err.downcast::<P4StreamError>() {
        Ok(p4err) => {
            eprintln!("{}", p4err.display_for_user());
            return p4err.to_exit_code();
        }
        Err(err) => err,
    };

    match err.downcast::<ConfigError>() {
        Ok(cfg) => {
            let p4err = P4StreamError::Config(cfg);
            eprintln!("{}", p4err.display_for_user());
            p4err.to_exit_code()
        }
        Err(other) => {
            eprintln!("Error: {other:#}");
            ExitCode::CLI_ARGS
        }
    }
}
