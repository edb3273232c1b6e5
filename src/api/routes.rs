//! Router configuration for the API.
//!
//! Centralized route registration, OpenAPI assembly, and middleware.

use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, header},
    middleware,
    routing::get,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware, route_not_found};
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware - logs requests inside a span carrying the request ID
/// 3. CORS, compression, and the request timeout
///
/// # Routes
/// - `/health`, `/health/live`, `/health/ready`
/// - `/api/push/send`, `/api/push/test`
/// - `/api-docs/openapi.json`, plus Swagger UI outside production
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/api/push", handlers::push::push_routes())
        .split_for_parts();

    let router = if state.environment.is_production() {
        router.route(
            OPENAPI_PATH,
            get(move || {
                let api = api.clone();
                async move { Json(api) }
            }),
        )
    } else {
        router.merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, api))
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(request_timeout);

    router
        .fallback(route_not_found)
        .layer(timeout)
        .layer(CompressionLayer::new())
        .layer(cors)
        // Last added runs first, so logging sees the ID set by request_id
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
