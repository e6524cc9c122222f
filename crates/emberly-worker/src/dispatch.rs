//! Dispatch worker — drains the event outbox into the notifier.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Semaphore, mpsc, watch};
use tracing::{error, info};

use emberly_core::config::worker::WorkerConfig;
use emberly_core::events::DomainEvent;
use emberly_engine::notification::Notifier;

/// Consumes domain events from the outbox and runs the notification
/// pipeline for each.
///
/// Concurrency is bounded by a semaphore; events for different users run
/// in parallel while the notifier's per-user locks keep one user's feed
/// mutations serialized. A slow channel send only ties up one permit,
/// never the ingestion path.
pub struct DispatchWorker {
    notifier: Arc<Notifier>,
    config: WorkerConfig,
}

impl DispatchWorker {
    /// Create a dispatch worker.
    pub fn new(notifier: Arc<Notifier>, config: WorkerConfig) -> Self {
        Self { notifier, config }
    }

    /// Run until the outbox closes or the cancel signal fires.
    pub async fn run(
        &self,
        mut events: mpsc::UnboundedReceiver<DomainEvent>,
        mut cancel: watch::Receiver<bool>,
    ) {
        info!(
            concurrency = self.config.dispatch_concurrency,
            "Dispatch worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.dispatch_concurrency.max(1)));

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("Dispatch worker received shutdown signal");
                        break;
                    }
                }
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        info!("Event outbox closed; dispatch worker stopping");
                        break;
                    };
                    let permit = match Arc::clone(&semaphore).acquire_owned().await {
                        Ok(p) => p,
                        Err(_) => break,
                    };
                    let notifier = Arc::clone(&self.notifier);
                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(e) = notifier.handle_event(&event, Utc::now()).await {
                            error!("Failed to dispatch event {}: {}", event.id, e);
                        }
                    });
                }
            }
        }

        info!("Dispatch worker waiting for in-flight deliveries...");
        let max_permits = self.config.dispatch_concurrency.max(1) as u32;
        let _ = tokio::time::timeout(
            Duration::from_secs(30),
            semaphore.acquire_many(max_permits),
        )
        .await;
        info!("Dispatch worker shut down");
    }
}
