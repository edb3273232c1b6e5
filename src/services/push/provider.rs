//! Push provider trait and the provider-level message types.
//!
//! Messages serialize directly into the FCM HTTP v1 `message` object, so the
//! FCM provider can post them without a separate wire model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Visible notification content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Android-specific notification options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidNotification {
    pub sound: String,
}

/// Android delivery options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidConfig {
    /// "high" or "normal"
    pub priority: String,
    pub notification: AndroidNotification,
}

/// A message addressed to one device token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub token: String,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
}

impl PushMessage {
    pub fn new(token: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            notification: Notification {
                title: title.into(),
                body: body.into(),
            },
            android: None,
        }
    }

    pub fn with_android(mut self, priority: impl Into<String>, sound: impl Into<String>) -> Self {
        self.android = Some(AndroidConfig {
            priority: priority.into(),
            notification: AndroidNotification {
                sound: sound.into(),
            },
        });
        self
    }
}

/// Identifier returned by the provider for an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Trait for push delivery backends
///
/// Uses `async_trait` so providers can be shared as `Arc<dyn PushProvider>`.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Sends one message; every failure is reported as an error
    async fn send(&self, message: &PushMessage) -> AppResult<SendReceipt>;

    /// Returns the provider name for logging/debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_without_android_omits_field() {
        let message = PushMessage::new("abc123", "Test", "Push from Appwrite");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "token": "abc123",
                "notification": {"title": "Test", "body": "Push from Appwrite"}
            })
        );
    }

    #[test]
    fn test_message_with_android_options() {
        let message = PushMessage::new("tok1", "t", "b").with_android("high", "default");
        assert_eq!(
            serde_json::to_value(&message).unwrap()["android"],
            json!({"priority": "high", "notification": {"sound": "default"}})
        );
    }
}
