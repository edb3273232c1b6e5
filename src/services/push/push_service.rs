//! Push service: the two relay operations on top of a provider and a store.

use std::sync::Arc;

use super::profile_store::UserProfileStore;
use super::provider::{PushMessage, PushProvider, SendReceipt};
use crate::config::NotificationsConfig;
use crate::error::{AppError, AppResult};

/// Orchestrates direct-token pushes and per-user test pushes
#[derive(Clone)]
pub struct PushService {
    provider: Arc<dyn PushProvider>,
    store: Arc<dyn UserProfileStore>,
    config: NotificationsConfig,
}

impl PushService {
    pub fn new(
        provider: Arc<dyn PushProvider>,
        store: Arc<dyn UserProfileStore>,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    pub fn config(&self) -> &NotificationsConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Sends a notification straight to a device token
    ///
    /// Missing or empty title/body fall back to the configured defaults.
    /// A missing or empty token is rejected before the provider is called.
    pub async fn send_direct(
        &self,
        token: Option<&str>,
        title: Option<&str>,
        body: Option<&str>,
    ) -> AppResult<SendReceipt> {
        let token = present(token).ok_or(AppError::MissingToken)?;
        let defaults = &self.config.direct;

        let message = PushMessage::new(
            token,
            present(title).unwrap_or(defaults.default_title.as_str()),
            present(body).unwrap_or(defaults.default_body.as_str()),
        );

        tracing::info!(
            provider = self.provider.name(),
            token = %mask_token(token),
            title = %message.notification.title,
            "Sending push notification"
        );

        let receipt = self.provider.send(&message).await?;

        tracing::info!(message_id = %receipt.message_id, "Push notification sent");
        Ok(receipt)
    }

    /// Looks up the user's device token and sends the fixed test notification
    pub async fn send_test_notification(&self, uid: Option<&str>) -> AppResult<SendReceipt> {
        let uid = present(uid).ok_or(AppError::MissingUid)?;

        let profile = self
            .store
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::UserNotFound {
                uid: uid.to_string(),
            })?;

        let token = profile
            .fcm_token
            .as_deref()
            .and_then(|t| present(Some(t)))
            .ok_or_else(|| AppError::UserTokenMissing {
                uid: uid.to_string(),
            })?;

        let test = &self.config.test;
        let message = PushMessage::new(token, &test.title, &test.body)
            .with_android(test.android_priority.to_lowercase(), &test.android_sound);

        tracing::info!(
            provider = self.provider.name(),
            store = self.store.name(),
            uid = %uid,
            token = %mask_token(token),
            "Sending test notification"
        );

        let receipt = self.provider.send(&message).await?;

        tracing::info!(uid = %uid, message_id = %receipt.message_id, "Test notification sent");
        Ok(receipt)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Shortens a device token for log output
fn mask_token(token: &str) -> String {
    const VISIBLE: usize = 8;
    match token.char_indices().nth(VISIBLE) {
        Some((idx, _)) => format!("{}…", &token[..idx]),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::services::push::UserProfile;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingProvider {
        sent: Mutex<Vec<PushMessage>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl PushProvider for RecordingProvider {
        async fn send(&self, message: &PushMessage) -> AppResult<SendReceipt> {
            if let Some(message) = &self.fail_with {
                return Err(AppError::provider("recording", Some(500), message.clone()));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            Ok(SendReceipt {
                message_id: format!("msg-{}", sent.len()),
            })
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    #[derive(Default)]
    struct MapStore {
        profiles: HashMap<String, UserProfile>,
        lookups: AtomicUsize,
    }

    impl MapStore {
        fn with(uid: &str, token: Option<&str>) -> Self {
            let mut profiles = HashMap::new();
            profiles.insert(
                uid.to_string(),
                UserProfile {
                    uid: uid.to_string(),
                    fcm_token: token.map(str::to_string),
                },
            );
            Self {
                profiles,
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UserProfileStore for MapStore {
        async fn get_profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.profiles.get(uid).cloned())
        }

        fn name(&self) -> &'static str {
            "map"
        }
    }

    fn service(provider: Arc<RecordingProvider>, store: Arc<MapStore>) -> PushService {
        PushService::new(provider, store, NotificationsConfig::default())
    }

    #[tokio::test]
    async fn test_send_direct_applies_defaults() {
        let provider = Arc::new(RecordingProvider::default());
        let service = service(provider.clone(), Arc::new(MapStore::default()));

        let receipt = service.send_direct(Some("abc123"), None, Some("")).await.unwrap();
        assert_eq!(receipt.message_id, "msg-1");

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], PushMessage::new("abc123", "Test", "Push from Appwrite"));
    }

    #[tokio::test]
    async fn test_send_direct_uses_explicit_values() {
        let provider = Arc::new(RecordingProvider::default());
        let service = service(provider.clone(), Arc::new(MapStore::default()));

        service
            .send_direct(Some("abc123"), Some("Hello"), Some("World"))
            .await
            .unwrap();

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent[0].notification.title, "Hello");
        assert_eq!(sent[0].notification.body, "World");
        assert!(sent[0].android.is_none());
    }

    #[tokio::test]
    async fn test_send_direct_rejects_missing_token_without_sending() {
        let provider = Arc::new(RecordingProvider::default());
        let service = service(provider.clone(), Arc::new(MapStore::default()));

        for token in [None, Some("")] {
            let err = service.send_direct(token, Some("t"), None).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingToken);
        }
        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_direct_twice_sends_twice() {
        let provider = Arc::new(RecordingProvider::default());
        let service = service(provider.clone(), Arc::new(MapStore::default()));

        let first = service.send_direct(Some("abc123"), None, None).await.unwrap();
        let second = service.send_direct(Some("abc123"), None, None).await.unwrap();

        assert_ne!(first.message_id, second.message_id);
        assert_eq!(provider.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_send_direct_propagates_provider_error() {
        let provider = Arc::new(RecordingProvider {
            fail_with: Some("quota exceeded".to_string()),
            ..Default::default()
        });
        let service = service(provider, Arc::new(MapStore::default()));

        let err = service.send_direct(Some("abc123"), None, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_test_notification_missing_uid_skips_store() {
        let store = Arc::new(MapStore::default());
        let service = service(Arc::new(RecordingProvider::default()), store.clone());

        for uid in [None, Some("")] {
            let err = service.send_test_notification(uid).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingUid);
        }
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_test_notification_unknown_user() {
        let service = service(
            Arc::new(RecordingProvider::default()),
            Arc::new(MapStore::default()),
        );

        let err = service
            .send_test_notification(Some("missinguser"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UserNotFound);
    }

    #[tokio::test]
    async fn test_test_notification_user_without_token() {
        let provider = Arc::new(RecordingProvider::default());
        for token in [None, Some("")] {
            let service = service(provider.clone(), Arc::new(MapStore::with("u1", token)));
            let err = service.send_test_notification(Some("u1")).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingToken);
        }
        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_test_notification_sends_fixed_payload() {
        let provider = Arc::new(RecordingProvider::default());
        let service = service(provider.clone(), Arc::new(MapStore::with("u1", Some("tok1"))));

        service.send_test_notification(Some("u1")).await.unwrap();

        let sent = provider.sent.lock().unwrap();
        assert_eq!(
            sent[0],
            PushMessage::new(
                "tok1",
                "🔥 Test Notification",
                "AniVault notifications are working perfectly!"
            )
            .with_android("high", "default")
        );
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abc"), "abc");
        assert_eq!(mask_token("abcdefghijkl"), "abcdefgh…");
    }
}
