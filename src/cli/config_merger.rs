//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};

/// Applies CLI overrides on top of file-based configuration
///
/// CLI arguments take precedence over configuration file values.
pub struct ConfigurationMerger {
    base_config: Settings,
    environment: Environment,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings, environment: Environment) -> Self {
        Self {
            base_config,
            environment,
        }
    }

    /// Load the base configuration for this invocation
    ///
    /// A `--config` file replaces layered loading; `--env` replaces the
    /// environment detected from `PUSH_RELAY_APP_ENV`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config.as_deref() {
            Some(path) => {
                Self::validate_config_file_access(path)?;
                ConfigLoader::from_file(path)
            }
            None => ConfigLoader::new()?,
        };

        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        let environment = loader.environment();
        Ok(Self::new(loader.load()?, environment))
    }

    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ValidationError {
                field: "config_file".to_string(),
                message: format!("Configuration path is not a file: '{}'", path.display()),
            });
        }

        std::fs::File::open(path)
            .map(|_| ())
            .map_err(|e| ConfigError::ValidationError {
                field: "config_file".to_string(),
                message: format!("Cannot read configuration file '{}': {}", path.display(), e),
            })
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// The merged settings are validated again before being returned.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);

        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        if let Commands::Serve {
            host,
            port,
            log_level,
            dry_run: _,
        } = command
        {
            if let Some(host_addr) = host {
                config.server.host = host_addr.clone();
            }

            if let Some(port_num) = port {
                config.server.port = *port_num;
            }

            // Command-level log level beats --verbose/--quiet
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }

    /// Environment the base configuration was loaded for
    pub fn environment(&self) -> Environment {
        self.environment
    }
}
