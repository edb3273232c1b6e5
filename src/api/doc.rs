use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";
pub const PUSH_TAG: &str = "Push";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "push-relay",
        description = "Relays push notifications to Firebase Cloud Messaging",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::PushResponse,
            crate::api::dto::DirectPushRequest,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = PUSH_TAG, description = "Push notification endpoints"),
    )
)]
pub struct ApiDoc;
