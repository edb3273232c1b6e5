//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::server::Server;
use crate::state::AppState;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Start the server, or only validate when `dry_run` is set
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only()
        } else {
            Server::new(self.config, self.environment).run().await
        }
    }

    /// Validate configuration and credentials without binding a socket
    ///
    /// Builds the same clients the server would, so a missing credential or a
    /// malformed private key fails here too. No network calls are made.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");
        println!("✓ Environment: {}", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());

        let state = AppState::from_settings(&self.config, self.environment)?;
        println!("✓ Firebase credentials resolved");
        println!("✓ Push provider: {}", state.push.provider_name());
        println!("✓ Profile store: {}", state.push.store_name());

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
