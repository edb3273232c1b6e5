//! Conversion of `AppError` into structured JSON error responses.
//!
//! The push routes render their own response shapes; everything else
//! (health probes, unknown routes) uses [`ErrorResponse`].

use axum::{
    Json,
    extract::Extension,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Status comes from the error kind; server-side details are withheld.
    fn into_response(self) -> Response {
        let kind = self.kind();
        tracing::error!(error = %self, kind = ?kind, "Request failed");

        let error_response = ErrorResponse::new(kind.code(), &self.public_message(false));
        (kind.status_code(), Json(error_response)).into_response()
    }
}

/// Fallback for requests that match no route
pub async fn route_not_found(
    request_id: Option<Extension<RequestId>>,
    uri: Uri,
) -> (StatusCode, Json<ErrorResponse>) {
    let mut error_response =
        ErrorResponse::new("NOT_FOUND", &format!("No route for {}", uri.path()));
    if let Some(Extension(RequestId(id))) = request_id {
        error_response = error_response.with_request_id(&id);
    }

    (StatusCode::NOT_FOUND, Json(error_response))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_provider_error_response_hides_details() {
        let response = AppError::provider("oauth", Some(401), "invalid_grant").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "PROVIDER_ERROR");
        assert_eq!(body["message"], "Internal error");
    }

    #[tokio::test]
    async fn test_client_error_response_keeps_message() {
        let response = AppError::MissingUid.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "MISSING_UID");
        assert_eq!(body["message"], "Missing uid parameter");
    }
}
