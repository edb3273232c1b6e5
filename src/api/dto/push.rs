//! Push request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Body of `POST /api/push/send`
///
/// Absent, `null`, and empty-string values are all treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectPushRequest {
    /// Device registration token
    #[schema(example = "abc123")]
    pub fcm_token: Option<String>,
    /// Notification title, defaults to "Test"
    pub title: Option<String>,
    /// Notification body, defaults to "Push from Appwrite"
    pub message: Option<String>,
}

impl DirectPushRequest {
    /// Decodes a raw request body; an empty body is read as `{}`.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_slice::<Self>(body)
            .map(Self::normalized)
            .map_err(|e| AppError::invalid_payload(e.to_string()))
    }

    /// Maps empty strings to `None`
    pub fn normalized(self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            fcm_token: non_empty(self.fcm_token),
            title: non_empty(self.title),
            message: non_empty(self.message),
        }
    }
}

/// JSON result of a direct push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub success: bool,
    /// Provider message id, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Failure description, present on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PushResponse {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Query of `GET /api/push/test`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TestPushQuery {
    /// Id of the user whose stored device token is used
    pub uid: Option<String>,
}
