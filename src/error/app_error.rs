use axum::http::StatusCode;
use thiserror::Error;

use crate::config::error::ConfigError;

/// Generic text returned in place of upstream details when they are hidden
pub const GENERIC_ERROR_MESSAGE: &str = "Internal error";

/// Application-wide error type for the push relay.
///
/// Every variant maps onto one [`ErrorKind`], and the kind alone decides the
/// HTTP status. Display strings are what clients see when error details are
/// exposed, so they carry the upstream message verbatim.
#[derive(Error, Debug)]
pub enum AppError {
    /// Direct push request without a device token
    #[error("Missing fcmToken")]
    MissingToken,

    /// Stored profile exists but holds no usable device token
    #[error("No FCM token found for user {uid}")]
    UserTokenMissing { uid: String },

    /// Test push request without a user id
    #[error("Missing uid parameter")]
    MissingUid,

    /// No profile document for the user id
    #[error("User not found: {uid}")]
    UserNotFound { uid: String },

    /// Request body that does not decode into the expected shape
    #[error("{message}")]
    InvalidPayload { message: String },

    /// Upstream (OAuth, FCM, Firestore) rejected the call or was unreachable
    #[error("{message}")]
    Provider {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Configuration or credential error with the offending key
    #[error("Configuration error for '{key}': {source}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// Error classification shared by both push handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingToken,
    MissingUid,
    UserNotFound,
    InvalidPayload,
    Provider,
    Configuration,
    Internal,
}

impl ErrorKind {
    /// The one place kinds are mapped to HTTP statuses
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::MissingToken | ErrorKind::MissingUid => StatusCode::BAD_REQUEST,
            ErrorKind::UserNotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidPayload
            | ErrorKind::Provider
            | ErrorKind::Configuration
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code used in structured error bodies
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MissingToken => "MISSING_TOKEN",
            ErrorKind::MissingUid => "MISSING_UID",
            ErrorKind::UserNotFound => "USER_NOT_FOUND",
            ErrorKind::InvalidPayload => "INVALID_PAYLOAD",
            ErrorKind::Provider => "PROVIDER_ERROR",
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingToken | AppError::UserTokenMissing { .. } => ErrorKind::MissingToken,
            AppError::MissingUid => ErrorKind::MissingUid,
            AppError::UserNotFound { .. } => ErrorKind::UserNotFound,
            AppError::InvalidPayload { .. } => ErrorKind::InvalidPayload,
            AppError::Provider { .. } => ErrorKind::Provider,
            AppError::Configuration { .. } => ErrorKind::Configuration,
            AppError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        AppError::InvalidPayload {
            message: message.into(),
        }
    }

    pub fn provider(provider: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Provider {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Message safe to return to a client.
    ///
    /// Client errors always carry their own text; server errors are replaced
    /// by [`GENERIC_ERROR_MESSAGE`] unless `expose_details` is set.
    pub fn public_message(&self, expose_details: bool) -> String {
        if expose_details || !self.status_code().is_server_error() {
            self.to_string()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Configuration {
            key: error.key().to_string(),
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
