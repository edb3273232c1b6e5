//! Shared fixtures for router-level tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use tower::ServiceExt;

use push_relay::api::routes::create_router;
use push_relay::config::{Environment, NotificationsConfig};
use push_relay::error::{AppError, AppResult};
use push_relay::services::push::{
    PushMessage, PushProvider, PushService, SendReceipt, UserProfile, UserProfileStore,
};
use push_relay::state::AppState;

pub const MESSAGE_ID: &str = "projects/demo-project/messages/0:1700000000000000%abc";

/// Provider that records every message and answers with a fixed outcome
#[derive(Default)]
pub struct RecordingProvider {
    pub sent: Mutex<Vec<PushMessage>>,
    pub failure: Option<String>,
}

impl RecordingProvider {
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn messages(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushProvider for RecordingProvider {
    async fn send(&self, message: &PushMessage) -> AppResult<SendReceipt> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.failure {
            Some(msg) => Err(AppError::provider("fcm", Some(400), msg.clone())),
            None => Ok(SendReceipt {
                message_id: MESSAGE_ID.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// In-memory profile store counting lookups
#[derive(Default)]
pub struct MemoryStore {
    pub profiles: HashMap<String, UserProfile>,
    pub lookups: AtomicUsize,
    pub unavailable: bool,
}

impl MemoryStore {
    pub fn with_user(mut self, uid: &str, fcm_token: Option<&str>) -> Self {
        self.profiles.insert(
            uid.to_string(),
            UserProfile {
                uid: uid.to_string(),
                fcm_token: fcm_token.map(str::to_string),
            },
        );
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserProfileStore for MemoryStore {
    async fn get_profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(AppError::provider(
                "firestore",
                Some(503),
                "The service is currently unavailable.",
            ));
        }
        Ok(self.profiles.get(uid).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<RecordingProvider>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new(provider: RecordingProvider, store: MemoryStore) -> Self {
        Self::with_config(provider, store, NotificationsConfig::default(), Environment::Test)
    }

    pub fn with_config(
        provider: RecordingProvider,
        store: MemoryStore,
        config: NotificationsConfig,
        environment: Environment,
    ) -> Self {
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let push = PushService::new(provider.clone(), store.clone(), config);
        let router = create_router(AppState::new(push, environment), Duration::from_secs(5));
        Self {
            router,
            provider,
            store,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response<Body> {
        self.request(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
