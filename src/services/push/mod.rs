//! Push delivery with pluggable providers and profile stores.
//!
//! `PushProvider` abstracts the delivery backend (FCM in production) and
//! `UserProfileStore` the device-token lookup (Firestore in production).
//! `PushService` combines the two into the relay's operations.

mod fcm_provider;
mod firestore_store;
mod profile_store;
mod provider;
mod push_service;

pub use fcm_provider::FcmProvider;
pub use firestore_store::FirestoreProfileStore;
pub use profile_store::{UserProfile, UserProfileStore};
pub use provider::{AndroidConfig, AndroidNotification, Notification, PushMessage, PushProvider, SendReceipt};
pub use push_service::PushService;
