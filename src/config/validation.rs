//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.
//! Credentials are not checked here: they may still arrive from the process
//! environment and are resolved when the Google clients are built.

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, FirebaseConfig, LoggerSettings, NotificationsConfig, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Valid Android delivery priorities accepted by FCM
const VALID_ANDROID_PRIORITIES: &[&str] = &["high", "normal"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()?;

        Ok(())
    }
}

impl FirebaseConfig {
    /// Validate upstream endpoints and Firestore naming
    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            ("firebase.token_uri", &self.token_uri),
            ("firebase.fcm_base_url", &self.fcm_base_url),
            ("firebase.firestore_base_url", &self.firestore_base_url),
        ];
        for (field, url) in urls {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: format!("'{}' is not an http(s) URL.", url),
                });
            }
        }

        let names = [
            ("firebase.database", &self.database),
            ("firebase.users_collection", &self.users_collection),
            ("firebase.token_field", &self.token_field),
        ];
        for (field, name) in names {
            if name.trim().is_empty() || name.contains('/') {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: "Must be a non-empty name without '/'.".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl NotificationsConfig {
    /// Validate notification payload settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let priority = self.test.android_priority.to_lowercase();
        if !VALID_ANDROID_PRIORITIES.contains(&priority.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "notifications.test.android_priority".to_string(),
                message: format!(
                    "Invalid Android priority '{}'. Valid values are: {}",
                    self.test.android_priority,
                    VALID_ANDROID_PRIORITIES.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.firebase.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}
