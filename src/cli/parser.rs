//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Push notification relay for Firebase Cloud Messaging
#[derive(Parser, Debug)]
#[command(name = "push-relay")]
#[command(about = "Push notification relay for Firebase Cloud Messaging")]
#[command(long_about = "
push-relay exposes a small HTTP API that forwards push notifications to
Firebase Cloud Messaging, either to a device token supplied by the caller or
to the token stored on a user's Firestore profile.

EXAMPLES:
    # Start the server with default configuration
    push-relay serve

    # Start server on custom host and port
    push-relay serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    push-relay --config /etc/push-relay/production.toml serve

    # Check configuration and credentials without starting the server
    push-relay serve --dry-run

    # Send a one-off notification to a device token
    push-relay send --token <FCM_TOKEN> --title Hello --message World

    # Send the fixed test notification to a user's stored token
    push-relay test --uid alice
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// `PUSH_RELAY_*` environment variables still apply on top of it.
    ///
    /// Example: --config /etc/push-relay/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects the `{environment}.toml` overlay and whether developer tooling
    /// such as the Swagger UI is served.
    ///
    /// Available values: development (dev), test, staging (stage), production (prod)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP relay (default)
    ///
    /// Resolves Firebase credentials, binds to the configured address and
    /// serves the push API until interrupted.
    ///
    /// Examples:
    ///   push-relay serve                           # Start with defaults
    ///   push-relay serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   push-relay serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept connections
        /// from any interface.
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Must be between 1 and 65535.
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Takes precedence over the configuration file and the global
        /// --verbose/--quiet flags.
        ///
        /// Available levels: error, warn, info, debug, trace
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and credentials, then exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Send one notification directly to a device token
    ///
    /// Uses the same defaults as `POST /api/push` when --title or --message
    /// are omitted.
    ///
    /// Example:
    ///   push-relay send --token <FCM_TOKEN> --title "Hello" --message "World"
    Send {
        /// FCM device registration token
        #[arg(short, long, value_name = "TOKEN", value_parser = super::validation::validate_device_token)]
        token: String,

        /// Notification title
        #[arg(long)]
        title: Option<String>,

        /// Notification body
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Send the fixed test notification to a user's stored token
    ///
    /// Looks up the user's profile document in Firestore, exactly like
    /// `GET /api/push/test`.
    ///
    /// Example:
    ///   push-relay test --uid alice
    Test {
        /// User id whose profile holds the device token
        #[arg(short, long, value_name = "UID", value_parser = super::validation::validate_uid)]
        uid: String,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }

    /// Whether this invocation runs the HTTP server
    pub fn is_serve(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve { .. }))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
