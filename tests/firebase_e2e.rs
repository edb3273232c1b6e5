//! Full relay against mocked Google endpoints

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{body_json, body_text};
use push_relay::api::routes::create_router;
use push_relay::config::{Environment, Settings};
use push_relay::state::AppState;

const PRIVATE_KEY: &str = include_str!("fixtures/test_rsa_key.pem");
const SEND_PATH: &str = "/v1/projects/demo-project/messages:send";
const USERS_PATH: &str = "/v1/projects/demo-project/databases/(default)/documents/users";

struct Relay {
    server: MockServer,
    router: axum::Router,
}

impl Relay {
    async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.e2e",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = Settings::default();
        settings.firebase.project_id = "demo-project".to_string();
        settings.firebase.client_email = "relay@demo-project.iam.gserviceaccount.com".to_string();
        // Keys pasted into env files usually carry escaped newlines
        settings.firebase.private_key = PRIVATE_KEY.replace('\n', "\\n");
        settings.firebase.token_uri = format!("{}/token", server.uri());
        settings.firebase.fcm_base_url = server.uri();
        settings.firebase.firestore_base_url = server.uri();

        let state = AppState::from_settings(&settings, Environment::Test).unwrap();
        let router = create_router(state, Duration::from_secs(5));
        Self { server, router }
    }

    async fn get(&self, uri: &str) -> axum::http::Response<axum::body::Body> {
        use tower::ServiceExt;
        let request = axum::http::Request::get(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, body: &str) -> axum::http::Response<axum::body::Body> {
        use tower::ServiceExt;
        let request = axum::http::Request::post(uri)
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

#[tokio::test]
async fn direct_push_reaches_fcm_with_bearer_token() {
    let relay = Relay::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("authorization", "Bearer ya29.e2e"))
        .and(body_partial_json(json!({
            "message": {
                "token": "device-1",
                "notification": { "title": "Hi", "body": "There" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "projects/demo-project/messages/42" })),
        )
        .expect(2)
        .mount(&relay.server)
        .await;

    // The second send reuses the cached access token
    for _ in 0..2 {
        let response = relay
            .post(
                "/api/push/send",
                r#"{"fcmToken":"device-1","title":"Hi","message":"There"}"#,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "success": true, "messageId": "projects/demo-project/messages/42" })
        );
    }
}

#[tokio::test]
async fn direct_push_surfaces_fcm_error_message() {
    let relay = Relay::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "The registration token is not a valid FCM registration token",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&relay.server)
        .await;

    let response = relay
        .post("/api/push/send", r#"{"fcmToken":"bogus"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": false,
            "error": "The registration token is not a valid FCM registration token"
        })
    );
}

#[tokio::test]
async fn test_push_reads_token_from_firestore() {
    let relay = Relay::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/alice")))
        .and(header("authorization", "Bearer ya29.e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo-project/databases/(default)/documents/users/alice",
            "fields": {
                "fcmToken": { "stringValue": "alice-device" },
                "displayName": { "stringValue": "Alice" }
            }
        })))
        .expect(1)
        .mount(&relay.server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(json!({
            "message": {
                "token": "alice-device",
                "notification": { "title": "🔥 Test Notification" },
                "android": { "priority": "high", "notification": { "sound": "default" } }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "projects/demo-project/messages/7" })),
        )
        .expect(1)
        .mount(&relay.server)
        .await;

    let response = relay.get("/api/push/test?uid=alice").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "✅ Test notification sent successfully!"
    );
}

#[tokio::test]
async fn test_push_unknown_user_never_calls_fcm() {
    let relay = Relay::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&relay.server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&relay.server)
        .await;

    let response = relay.get("/api/push/test?uid=ghost").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "❌ User not found");
}

#[tokio::test]
async fn test_push_dot_uid_is_not_found() {
    let relay = Relay::start().await;

    // Listing the collection must never be mistaken for a profile
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{ "name": "projects/demo-project/databases/(default)/documents/users/alice" }]
        })))
        .expect(0)
        .mount(&relay.server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&relay.server)
        .await;

    for uid in ["..", ".", "ghost"] {
        let response = relay.get(&format!("/api/push/test?uid={uid}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uid {uid:?}");
        assert_eq!(body_text(response).await, "❌ User not found");
    }
}
