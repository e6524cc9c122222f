//! Domain events emitted by the matching engine.
//!
//! Events are collected in the outbox by the ingestion path and consumed
//! by the notification pipeline; the Match-formed event is the sole
//! trigger for match notifications.

pub mod message;
pub mod pairing;
pub mod swipe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use message::MessageEvent;
pub use pairing::MatchEvent;
pub use swipe::SwipeEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A swipe-related event.
    Swipe(SwipeEvent),
    /// A mutual-match event.
    Match(MatchEvent),
    /// A messaging event.
    Message(MessageEvent),
}

impl DomainEvent {
    /// Create a new domain event stamped with the given time.
    pub fn new(occurred_at: DateTime<Utc>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at,
            payload,
        }
    }
}
