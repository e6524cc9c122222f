//! Push provider sender — POSTs an opaque JSON payload to the provider.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use emberly_core::config::outbound::PushConfig;
use emberly_core::error::AppError;
use emberly_entity::notification::{Channel, Notification};

use crate::sender::{ChannelSender, SendError};

/// Sends push notifications to the configured provider endpoint.
#[derive(Debug, Clone)]
pub struct HttpPushSender {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPushSender {
    /// Build a sender from configuration.
    pub fn new(config: &PushConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build push client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl ChannelSender for HttpPushSender {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let body = serde_json::json!({
            "user_id": notification.user_id,
            "notification_id": notification.id,
            "kind": notification.kind,
            "title": notification.title,
            "body": notification.body,
            "priority": notification.priority,
            "payload": notification.payload,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(notification_id = %notification.id, "Push accepted by provider");
            Ok(())
        } else if status.is_server_error() || status.as_u16() == 429 {
            Err(SendError::Transient(format!(
                "Push provider returned {status}"
            )))
        } else {
            Err(SendError::Permanent(format!(
                "Push provider rejected message: {status}"
            )))
        }
    }
}

/// Timeouts and connection errors are retryable; everything else is not.
pub(crate) fn classify_request_error(err: reqwest::Error) -> SendError {
    if err.is_timeout() || err.is_connect() {
        SendError::Transient(err.to_string())
    } else {
        SendError::Permanent(err.to_string())
    }
}
