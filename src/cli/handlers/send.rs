//! One-shot send commands
//!
//! `send` and `test` run the same push operations as the HTTP handlers,
//! without starting the server.

use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::services::push::SendReceipt;
use crate::state::AppState;

/// Handler for the `send` and `test` commands
pub struct SendCommandHandler {
    state: AppState,
}

impl SendCommandHandler {
    /// Build the push clients from settings
    pub fn new(config: &Settings, environment: Environment) -> AppResult<Self> {
        Ok(Self {
            state: AppState::from_settings(config, environment)?,
        })
    }

    /// Push directly to a device token
    pub async fn send_direct(
        &self,
        token: &str,
        title: Option<&str>,
        message: Option<&str>,
    ) -> AppResult<SendReceipt> {
        let receipt = self
            .state
            .push
            .send_direct(Some(token), title, message)
            .await?;
        println!("✓ Push sent: {}", receipt.message_id);
        Ok(receipt)
    }

    /// Push the fixed test notification to a user's stored token
    pub async fn send_test(&self, uid: &str) -> AppResult<SendReceipt> {
        let receipt = self.state.push.send_test_notification(Some(uid)).await?;
        println!("✓ Test notification sent to {}: {}", uid, receipt.message_id);
        Ok(receipt)
    }
}
