//! Firebase Cloud Messaging provider (HTTP v1 API).
//!
//! Uses the global `HTTP_CLIENT` and a shared [`AccessTokenSource`] for the
//! bearer token.
//!
//! FCM API Reference: https://firebase.google.com/docs/reference/fcm/rest/v1/projects.messages/send

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{PushMessage, PushProvider, SendReceipt};
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::external::google::{AccessTokenSource, upstream_error_message};

const PROVIDER_NAME: &str = "fcm";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a PushMessage,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

/// FCM push provider bound to one Firebase project
#[derive(Clone)]
pub struct FcmProvider {
    send_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FcmProvider {
    /// # Arguments
    /// * `base_url` - FCM API root, normally `https://fcm.googleapis.com`
    /// * `project_id` - Firebase project the messages are sent through
    /// * `tokens` - Source of OAuth2 bearer tokens
    pub fn new(base_url: &str, project_id: &str, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                base_url.trim_end_matches('/'),
                project_id
            ),
            tokens,
        }
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    async fn send(&self, message: &PushMessage) -> AppResult<SendReceipt> {
        let start = Instant::now();
        let access_token = self.tokens.access_token().await?;

        let response = HTTP_CLIENT
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(|e| {
                AppError::provider(PROVIDER_NAME, None, format!("FCM send request failed: {}", e))
            })?;

        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), duration_ms, body = %body, "FCM rejected message");
            return Err(AppError::provider(
                PROVIDER_NAME,
                Some(status.as_u16()),
                upstream_error_message(status.as_u16(), &body),
            ));
        }

        let sent: SendResponse = response.json().await.map_err(|e| {
            AppError::provider(
                PROVIDER_NAME,
                Some(status.as_u16()),
                format!("Failed to parse FCM response: {}", e),
            )
        })?;

        tracing::debug!(message_id = %sent.name, duration_ms, "FCM accepted message");

        Ok(SendReceipt {
            message_id: sent.name,
        })
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
