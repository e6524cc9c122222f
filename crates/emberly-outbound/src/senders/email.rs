//! Email provider sender.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use emberly_core::config::outbound::EmailConfig;
use emberly_core::error::AppError;
use emberly_entity::notification::{Channel, Notification};

use crate::sender::{ChannelSender, SendError};
use crate::senders::push::classify_request_error;

/// Sends notification emails through the configured provider endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: String,
    from_address: String,
}

impl HttpEmailSender {
    /// Build a sender from configuration.
    pub fn new(config: &EmailConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build email client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl ChannelSender for HttpEmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let body = serde_json::json!({
            "from": self.from_address,
            "to_user": notification.user_id,
            "subject": notification.title,
            "text": notification.body,
            "notification_id": notification.id,
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
            debug!(notification_id = %notification.id, "Email accepted by provider");
            Ok(())
        } else if status.is_server_error() || status.as_u16() == 429 {
            Err(SendError::Transient(format!(
                "Email provider returned {status}"
            )))
        } else {
            Err(SendError::Permanent(format!(
                "Email provider rejected message: {status}"
            )))
        }
    }
}
