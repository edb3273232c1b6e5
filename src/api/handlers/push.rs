//! Push relay handlers.
//!
//! Both handlers turn every outcome into their own response shape: JSON
//! `{success, messageId?, error?}` for the direct push, plain text for the
//! per-user test push.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PUSH_TAG;
use crate::api::dto::{DirectPushRequest, PushResponse, TestPushQuery};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const TEST_SENT_TEXT: &str = "✅ Test notification sent successfully!";
pub const MISSING_UID_TEXT: &str = "❌ Missing uid parameter";
pub const USER_NOT_FOUND_TEXT: &str = "❌ User not found";
pub const NO_TOKEN_TEXT: &str = "❌ No FCM token found for user";

/// Creates push routes.
///
/// Routes:
/// - POST /send - Push to an explicit device token
/// - GET /test  - Push the fixed test notification to a stored user's device
pub fn push_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(send_push))
        .routes(routes!(send_test_push))
}

/// POST /api/push/send - Direct-token push
///
/// The body is read raw so that an empty body counts as `{}` and malformed
/// JSON is reported in the same `{success, error}` shape as other failures.
#[utoipa::path(
    post,
    path = "/send",
    tag = PUSH_TAG,
    request_body = DirectPushRequest,
    responses(
        (status = 200, description = "Notification accepted by FCM", body = PushResponse),
        (status = 400, description = "Missing fcmToken", body = PushResponse),
        (status = 500, description = "Malformed body or upstream failure", body = PushResponse)
    )
)]
async fn send_push(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<PushResponse>) {
    tracing::info!(body_len = body.len(), "Direct push invoked");

    match direct_push(&state, &body).await {
        Ok(message_id) => (StatusCode::OK, Json(PushResponse::sent(message_id))),
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.kind(), "Direct push failed");
            let expose = state.push.config().expose_error_details;
            (e.status_code(), Json(PushResponse::failed(e.public_message(expose))))
        }
    }
}

async fn direct_push(state: &AppState, body: &[u8]) -> AppResult<String> {
    let request = DirectPushRequest::from_body(body)?;
    tracing::info!(
        has_token = request.fcm_token.is_some(),
        has_title = request.title.is_some(),
        has_message = request.message.is_some(),
        "Request body parsed"
    );

    let receipt = state
        .push
        .send_direct(
            request.fcm_token.as_deref(),
            request.title.as_deref(),
            request.message.as_deref(),
        )
        .await?;

    Ok(receipt.message_id)
}

/// GET /api/push/test - Test push to a stored user
///
/// Looks up `users/{uid}` and sends a fixed notification with Android
/// high priority and the default sound.
#[utoipa::path(
    get,
    path = "/test",
    tag = PUSH_TAG,
    params(TestPushQuery),
    responses(
        (status = 200, description = "Test notification sent", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing uid, or user has no token", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Store or upstream failure", body = String, content_type = "text/plain")
    )
)]
async fn send_test_push(
    State(state): State<AppState>,
    query: Result<Query<TestPushQuery>, QueryRejection>,
) -> (StatusCode, String) {
    let result = match query {
        Ok(Query(query)) => state.push.send_test_notification(query.uid.as_deref()).await,
        Err(rejection) => Err(AppError::invalid_payload(rejection.body_text())),
    };

    match result {
        Ok(_) => (StatusCode::OK, TEST_SENT_TEXT.to_string()),
        Err(e) => {
            let status = e.status_code();
            let text = match &e {
                AppError::MissingUid => MISSING_UID_TEXT.to_string(),
                AppError::UserNotFound { .. } => USER_NOT_FOUND_TEXT.to_string(),
                AppError::UserTokenMissing { .. } => NO_TOKEN_TEXT.to_string(),
                other => {
                    tracing::error!(error = %other, kind = ?other.kind(), "Error sending test notification");
                    let expose = state.push.config().expose_error_details;
                    format!("Error: {}", other.public_message(expose))
                }
            };
            if !status.is_server_error() {
                tracing::warn!(error = %e, "Test notification rejected");
            }
            (status, text)
        }
    }
}
