//! In-memory recording sender for tests and local runs.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use emberly_entity::notification::{Channel, Notification};

use crate::sender::{ChannelSender, SendError};

/// A sender that records everything it is asked to deliver.
///
/// Can be primed to fail the first N sends transiently, which is how the
/// dispatcher's retry path is exercised.
#[derive(Debug)]
pub struct RecordingSender {
    channel: Channel,
    sent: Mutex<Vec<Notification>>,
    fail_transient: AtomicU32,
    fail_permanent: AtomicU32,
}

impl RecordingSender {
    /// Create a recording sender for the given channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            sent: Mutex::new(Vec::new()),
            fail_transient: AtomicU32::new(0),
            fail_permanent: AtomicU32::new(0),
        }
    }

    /// Fail the next `n` sends with a transient error.
    pub fn fail_next_transient(&self, n: u32) {
        self.fail_transient.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` sends with a permanent error.
    pub fn fail_next_permanent(&self, n: u32) {
        self.fail_permanent.store(n, Ordering::SeqCst);
    }

    /// Everything delivered so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of successful deliveries.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl ChannelSender for RecordingSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        if self
            .fail_permanent
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SendError::Permanent("primed permanent failure".to_string()));
        }
        if self
            .fail_transient
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SendError::Transient("primed transient failure".to_string()));
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
        Ok(())
    }
}
