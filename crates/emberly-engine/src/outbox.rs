//! Outbox of emitted domain events.
//!
//! Ingestion publishes events here and returns; the dispatch worker
//! drains the receiver. Keeping an explicit outbox (rather than calling
//! the pipeline from ingestion) means a slow or failing channel can
//! never block swipe processing.

use tokio::sync::mpsc;
use tracing::warn;

use emberly_core::events::DomainEvent;

/// Sending half of the event outbox.
#[derive(Debug, Clone)]
pub struct EventOutbox {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl EventOutbox {
    /// Create an outbox and the receiver the dispatch worker drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publish an event. Dropped with a warning if no consumer is
    /// running; ingestion must never fail because dispatch is down.
    pub fn publish(&self, event: DomainEvent) {
        if self.tx.send(event).is_err() {
            warn!("Event outbox has no consumer; dropping event");
        }
    }
}
