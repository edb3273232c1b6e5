//! Application state for Axum web framework.
//!
//! Built once at startup; handlers share the clients through `Arc`s.

use std::sync::Arc;

use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::external::google::{
    AccessTokenSource, ServiceAccountCredentials, ServiceAccountTokenProvider,
};
use crate::services::push::{FcmProvider, FirestoreProfileStore, PushService};

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since the push clients sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub push: PushService,
    pub environment: Environment,
    /// Google token source, used by the readiness probe
    pub auth: Option<Arc<dyn AccessTokenSource>>,
}

impl AppState {
    pub fn new(push: PushService, environment: Environment) -> Self {
        Self {
            push,
            environment,
            auth: None,
        }
    }

    pub fn with_auth(mut self, auth: Arc<dyn AccessTokenSource>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Resolves credentials and builds the FCM and Firestore clients.
    ///
    /// Fails on missing credentials or an unparsable private key, so a
    /// misconfigured relay never starts serving.
    pub fn from_settings(settings: &Settings, environment: Environment) -> AppResult<Self> {
        let firebase = &settings.firebase;
        let credentials = ServiceAccountCredentials::resolve(firebase)?;

        tracing::info!(
            project_id = %credentials.project_id,
            client_email = %credentials.client_email,
            key_id_configured = credentials.private_key_id.is_some(),
            "Firebase credentials resolved"
        );

        let tokens: Arc<dyn AccessTokenSource> =
            Arc::new(ServiceAccountTokenProvider::new(&credentials)?);

        let provider = Arc::new(FcmProvider::new(
            &firebase.fcm_base_url,
            &credentials.project_id,
            tokens.clone(),
        ));
        let store = Arc::new(FirestoreProfileStore::new(
            &firebase.firestore_base_url,
            &credentials.project_id,
            &firebase.database,
            &firebase.users_collection,
            firebase.token_field.clone(),
            tokens.clone(),
        )?);

        let push = PushService::new(provider, store, settings.notifications.clone());
        Ok(Self::new(push, environment).with_auth(tokens))
    }
}
