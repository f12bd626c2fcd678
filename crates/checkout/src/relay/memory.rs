//! In-memory notification relay.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Notification, NotificationRelay};
use crate::error::NotificationError;

#[derive(Debug, Default)]
struct InMemoryRelayState {
    sent: Vec<Notification>,
    attempts: usize,
    fail_on_send: bool,
}

/// Relay that records messages instead of sending them. Useful for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRelay {
    state: Arc<RwLock<InMemoryRelayState>>,
}

impl InMemoryNotificationRelay {
    /// Creates a new in-memory relay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the relay to reject every send.
    pub async fn set_fail_on_send(&self, fail: bool) {
        self.state.write().await.fail_on_send = fail;
    }

    /// Returns the messages delivered so far.
    pub async fn sent(&self) -> Vec<Notification> {
        self.state.read().await.sent.clone()
    }

    /// Returns how many sends were attempted, including failed ones.
    pub async fn attempts(&self) -> usize {
        self.state.read().await.attempts
    }
}

#[async_trait]
impl NotificationRelay for InMemoryNotificationRelay {
    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        let mut state = self.state.write().await;
        state.attempts += 1;

        if state.fail_on_send {
            return Err(NotificationError::Rejected(
                "mailbox unavailable".to_string(),
            ));
        }

        state.sent.push(notification);
        Ok(())
    }
}
