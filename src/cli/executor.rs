//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{SendCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// No subcommand runs the server, same as `serve`.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await
        }
        None => {
            ServeCommandHandler::new(settings, environment)
                .execute(false)
                .await
        }
        Some(Commands::Send {
            token,
            title,
            message,
        }) => {
            SendCommandHandler::new(&settings, environment)?
                .send_direct(token, title.as_deref(), message.as_deref())
                .await
                .map(|_| ())
        }
        Some(Commands::Test { uid }) => SendCommandHandler::new(&settings, environment)?
            .send_test(uid)
            .await
            .map(|_| ()),
    }
}

/// Validate command arguments before execution
fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|msg| AppError::Configuration {
        key: "cli_arguments".to_string(),
        source: anyhow::anyhow!(msg),
    })?;

    if let Some(Commands::Serve { host, port, .. }) = &cli.command {
        for warning in serve_warnings(host.as_deref(), *port) {
            eprintln!("Warning: {}", warning);
        }
    }

    Ok(())
}

/// Host/port combinations that are legal but likely mistakes
fn serve_warnings(host: Option<&str>, port: Option<u16>) -> Vec<String> {
    let mut warnings = Vec::new();

    if let (Some(host_addr), Some(port_num)) = (host, port) {
        if host_addr == "0.0.0.0" && port_num < 1024 {
            warnings.push(format!(
                "Binding to 0.0.0.0 on privileged port {} typically requires root privileges",
                port_num
            ));
        }

        if host_addr == "localhost" && port_num == 80 {
            warnings.push(
                "Using port 80 with localhost may conflict with other services".to_string(),
            );
        }
    }

    warnings
}
