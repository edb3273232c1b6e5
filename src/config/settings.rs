//! Configuration settings structures for push-relay
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "push-relay".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/push-relay.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_fcm_base_url() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_firestore_database() -> String {
    "(default)".to_string()
}

fn default_users_collection() -> String {
    "users".to_string()
}

fn default_token_field() -> String {
    "fcmToken".to_string()
}

fn default_direct_title() -> String {
    "Test".to_string()
}

fn default_direct_body() -> String {
    "Push from Appwrite".to_string()
}

fn default_test_title() -> String {
    "🔥 Test Notification".to_string()
}

fn default_test_body() -> String {
    "AniVault notifications are working perfectly!".to_string()
}

fn default_android_priority() -> String {
    "high".to_string()
}

fn default_android_sound() -> String {
    "default".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

// ============================================================================
// Firebase Configuration
// ============================================================================

/// Firebase service-account credentials and upstream endpoints.
///
/// The three credential fields may be left empty here; they are then filled
/// from the `FIREBASE_*` process environment or a service-account key file
/// when the clients are constructed (see `external::google::credentials`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Firebase / Google Cloud project id
    #[serde(default)]
    pub project_id: String,

    /// Service account e-mail (`...@<project>.iam.gserviceaccount.com`)
    #[serde(default)]
    pub client_email: String,

    /// PEM private key; literal `\n` sequences are accepted
    #[serde(default)]
    pub private_key: String,

    /// Optional key id, sent as the JWT `kid` header
    #[serde(default)]
    pub private_key_id: Option<String>,

    /// Path to a service-account JSON key file
    #[serde(default)]
    pub credentials_file: Option<String>,

    /// OAuth2 token endpoint used for the JWT-bearer grant
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// FCM HTTP v1 API base URL
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,

    /// Firestore REST API base URL
    #[serde(default = "default_firestore_base_url")]
    pub firestore_base_url: String,

    /// Firestore database id
    #[serde(default = "default_firestore_database")]
    pub database: String,

    /// Collection holding user profile documents
    #[serde(default = "default_users_collection")]
    pub users_collection: String,

    /// Profile field holding the device token
    #[serde(default = "default_token_field")]
    pub token_field: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            client_email: String::new(),
            private_key: String::new(),
            private_key_id: None,
            credentials_file: None,
            token_uri: default_token_uri(),
            fcm_base_url: default_fcm_base_url(),
            firestore_base_url: default_firestore_base_url(),
            database: default_firestore_database(),
            users_collection: default_users_collection(),
            token_field: default_token_field(),
        }
    }
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_configured", &!self.private_key.is_empty())
            .field("private_key_id", &self.private_key_id)
            .field("credentials_file", &self.credentials_file)
            .field("token_uri", &self.token_uri)
            .field("fcm_base_url", &self.fcm_base_url)
            .field("firestore_base_url", &self.firestore_base_url)
            .field("database", &self.database)
            .field("users_collection", &self.users_collection)
            .field("token_field", &self.token_field)
            .finish()
    }
}

// ============================================================================
// Notification Configuration
// ============================================================================

/// Fallback title/body for direct-token pushes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectPushDefaults {
    /// Title used when the request carries none
    #[serde(default = "default_direct_title")]
    pub default_title: String,

    /// Body used when the request carries no message
    #[serde(default = "default_direct_body")]
    pub default_body: String,
}

impl Default for DirectPushDefaults {
    fn default() -> Self {
        Self {
            default_title: default_direct_title(),
            default_body: default_direct_body(),
        }
    }
}

/// Fixed payload of the per-user test notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestNotificationConfig {
    #[serde(default = "default_test_title")]
    pub title: String,

    #[serde(default = "default_test_body")]
    pub body: String,

    /// Android delivery priority ("high" or "normal")
    #[serde(default = "default_android_priority")]
    pub android_priority: String,

    /// Android notification sound
    #[serde(default = "default_android_sound")]
    pub android_sound: String,
}

impl Default for TestNotificationConfig {
    fn default() -> Self {
        Self {
            title: default_test_title(),
            body: default_test_body(),
            android_priority: default_android_priority(),
            android_sound: default_android_sound(),
        }
    }
}

/// Push notification behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Whether 500 responses carry the upstream error text
    #[serde(default = "default_true")]
    pub expose_error_details: bool,

    #[serde(default)]
    pub direct: DirectPushDefaults,

    #[serde(default)]
    pub test: TestNotificationConfig,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            expose_error_details: default_true(),
            direct: DirectPushDefaults::default(),
            test: TestNotificationConfig::default(),
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to LoggerConfig
    ///
    /// This method transforms the configuration file representation into
    /// the runtime LoggerConfig used by the logger module.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Firebase credentials and endpoints
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Push notification behaviour
    #[serde(default)]
    pub notifications: NotificationsConfig,
}
