//! Error bodies returned by Google REST APIs.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extracts a readable message from `{"error": {code, message, status}}`.
///
/// Falls back to the raw body, or to the HTTP status when the body is empty.
pub fn upstream_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) if !error.message.is_empty() => error.message,
        Ok(ErrorEnvelope { error }) => error
            .status
            .unwrap_or_else(|| format!("Request failed with status {}", status)),
        Err(_) if body.trim().is_empty() => format!("Request failed with status {}", status),
        Err(_) => body.trim().to_string(),
    }
}
