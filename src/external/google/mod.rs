//! Google service-account authentication shared by the FCM and Firestore clients.

mod api_error;
mod credentials;
mod token;

pub use api_error::upstream_error_message;
pub use credentials::{ServiceAccountCredentials, unescape_private_key};
#[cfg(test)]
pub(crate) use token::StaticTokenSource;
pub use token::{AccessTokenSource, FIREBASE_SCOPES, ServiceAccountTokenProvider};
