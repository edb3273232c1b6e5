//! Health check endpoint handlers.
//!
//! Liveness only proves the process answers. Health and readiness also ask
//! the Google token source for an access token, which exercises the
//! service-account key and the OAuth endpoint.

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::ErrorResponse;
use crate::state::AppState;

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,
    /// Application version
    pub version: String,
    /// Timestamp of the health check (RFC 3339)
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Detailed checks for various components
    pub checks: HashMap<String, ComponentHealth>,
}

/// Health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn http_status(self) -> StatusCode {
        match self {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Individual component health information.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    /// Optional message with details
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: Some(message.into()),
            response_time_ms: None,
        }
    }
}

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Component report
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = HashMap::new();
    checks.insert(
        "push_provider".to_string(),
        ComponentHealth::healthy(state.push.provider_name()),
    );
    checks.insert(
        "profile_store".to_string(),
        ComponentHealth::healthy(state.push.store_name()),
    );
    if state.auth.is_some() {
        checks.insert("google_auth".to_string(), check_google_auth(&state).await);
    }

    let status = if checks
        .values()
        .any(|c| c.status == HealthStatus::Unhealthy)
    {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    };

    (status.http_status(), Json(response))
}

/// Readiness probe endpoint.
///
/// Ready once the push clients exist and a Google access token can be obtained.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready", body = ErrorResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    let Some(auth) = state.auth.as_ref() else {
        return StatusCode::OK.into_response();
    };

    match auth.access_token().await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.into_response()).into_response(),
    }
}

/// Liveness probe endpoint.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_google_auth(state: &AppState) -> ComponentHealth {
    let Some(auth) = state.auth.as_ref() else {
        return ComponentHealth::healthy("not configured");
    };

    let start = Instant::now();
    let result = auth.access_token().await;
    let response_time_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(_) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Access token available".to_string()),
            response_time_ms,
        },
        Err(e) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
