//! Cloud Firestore profile store (REST API, read-only).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::profile_store::{UserProfile, UserProfileStore};
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::external::google::{AccessTokenSource, upstream_error_message};

const STORE_NAME: &str = "firestore";

/// Firestore `Document` resource, fields left as typed JSON values
///
/// `name` is required so that any other 200 body (a document listing, for
/// one) fails to decode instead of reading as an empty profile.
#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Reads a `{"stringValue": "..."}` field, ignoring other value types
    fn string_field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .and_then(|value| value.get("stringValue"))
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Reads user profiles from one Firestore collection
#[derive(Clone)]
pub struct FirestoreProfileStore {
    collection_url: Url,
    token_field: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FirestoreProfileStore {
    pub fn new(
        base_url: &str,
        project_id: &str,
        database: &str,
        collection: &str,
        token_field: impl Into<String>,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> AppResult<Self> {
        let raw = format!(
            "{}/v1/projects/{}/databases/{}/documents/{}",
            base_url.trim_end_matches('/'),
            project_id,
            database,
            collection
        );
        let collection_url = Url::parse(&raw).map_err(|e| AppError::Configuration {
            key: "firebase.firestore_base_url".to_string(),
            source: anyhow::anyhow!("Invalid Firestore URL '{}': {}", raw, e),
        })?;

        if collection_url.cannot_be_a_base() {
            return Err(AppError::Configuration {
                key: "firebase.firestore_base_url".to_string(),
                source: anyhow::anyhow!("Firestore URL '{}' cannot carry a path", raw),
            });
        }

        Ok(Self {
            collection_url,
            token_field: token_field.into(),
            tokens,
        })
    }

    /// Whether `uid` can name a document at all
    ///
    /// `.` and `..` are dropped by URL path normalization and would address
    /// the collection itself.
    fn is_document_id(uid: &str) -> bool {
        !matches!(uid, "" | "." | "..")
    }

    /// Document URL for `uid`; the id is percent-encoded as a single segment
    pub fn document_url(&self, uid: &str) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(uid);
        }
        url
    }
}

#[async_trait]
impl UserProfileStore for FirestoreProfileStore {
    async fn get_profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
        if !Self::is_document_id(uid) {
            tracing::debug!(uid = %uid, "Not a valid Firestore document id");
            return Ok(None);
        }

        let access_token = self.tokens.access_token().await?;

        let response = HTTP_CLIENT
            .get(self.document_url(uid))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::provider(STORE_NAME, None, format!("Firestore request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::provider(
                STORE_NAME,
                Some(status.as_u16()),
                upstream_error_message(status.as_u16(), &body),
            ));
        }

        let document: Document = response.json().await.map_err(|e| {
            AppError::provider(
                STORE_NAME,
                Some(status.as_u16()),
                format!("Failed to parse Firestore document: {}", e),
            )
        })?;
        tracing::debug!(document = %document.name, "Firestore document fetched");

        Ok(Some(UserProfile {
            uid: uid.to_string(),
            fcm_token: document.string_field(&self.token_field),
        }))
    }

    fn name(&self) -> &'static str {
        STORE_NAME
    }
}
