//! User profile lookup used by the test push.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// The parts of a stored user profile the relay reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    /// `None` when the field is missing, not a string, or empty
    pub fcm_token: Option<String>,
}

/// Read-only access to user profiles keyed by user id
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    /// `Ok(None)` when no profile exists for `uid`
    async fn get_profile(&self, uid: &str) -> AppResult<Option<UserProfile>>;

    fn name(&self) -> &'static str;
}
