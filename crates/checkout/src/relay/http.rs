//! Email relay reached over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Notification, NotificationRelay};
use crate::error::NotificationError;

/// Configuration for an HTTP email relay.
#[derive(Debug, Clone)]
pub struct HttpRelayConfig {
    /// Endpoint accepting `POST` with a JSON `{to, subject, text}` body.
    pub url: String,

    /// Sent as a bearer token when present.
    pub api_key: Option<String>,

    /// Upper bound on one send, connection included.
    pub timeout: Duration,
}

/// Sends notifications as JSON to a transactional email endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmailRelay {
    config: HttpRelayConfig,
    http: Client,
}

impl HttpEmailRelay {
    /// Create a new relay from the given configuration.
    pub fn new(config: HttpRelayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl NotificationRelay for HttpEmailRelay {
    #[tracing::instrument(skip(self, notification), fields(recipient = %notification.recipient))]
    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        let body = serde_json::json!({
            "to": notification.recipient,
            "subject": notification.subject,
            "text": notification.body,
        });

        let mut request = self
            .http
            .post(&self.config.url)
            .timeout(self.config.timeout)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotificationError::Rejected(format!(
                "relay responded with status {status}: {text}"
            )));
        }

        Ok(())
    }
}
