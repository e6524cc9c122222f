//! Messaging domain events, ingested from the external message service.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Events related to direct messages between matched users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageEvent {
    /// A message was sent to a user.
    Sent {
        /// The sending user.
        sender_id: UserId,
        /// The receiving user.
        recipient_id: UserId,
        /// Short preview of the message body.
        preview: String,
    },
}
