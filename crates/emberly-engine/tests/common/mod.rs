//! Shared test fixtures for the engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use emberly_core::config::matching::MatchingConfig;
use emberly_core::config::notifications::NotificationsConfig;
use emberly_core::events::DomainEvent;
use emberly_core::types::{GeoPoint, UserId};
use emberly_engine::EventOutbox;
use emberly_engine::notification::{ChannelDispatcher, NotificationService, Notifier};
use emberly_engine::swipe::SwipeService;
use emberly_entity::notification::Channel;
use emberly_entity::profile::{DiscoveryPreferences, Gender, Profile};
use emberly_outbound::senders::RecordingSender;
use emberly_store::memory::{
    MemoryDeliveryLedger, MemoryMatchStore, MemoryNotificationStore, MemoryPreferenceStore,
    MemorySwipeStore,
};

/// Fully wired engine over in-memory backends and recording senders.
pub struct TestEngine {
    pub directory: Arc<emberly_outbound::directory::MemoryUserDirectory>,
    pub swipes: Arc<MemorySwipeStore>,
    pub matches: Arc<MemoryMatchStore>,
    pub store: Arc<MemoryNotificationStore>,
    pub prefs: Arc<MemoryPreferenceStore>,
    pub ledger: Arc<MemoryDeliveryLedger>,
    pub push: Arc<RecordingSender>,
    pub email: Arc<RecordingSender>,
    pub swipe_service: SwipeService,
    pub notification_service: NotificationService,
    pub notifier: Arc<Notifier>,
    pub events: mpsc::UnboundedReceiver<DomainEvent>,
}

/// Build a test engine with fast retries and the given policy overrides.
pub fn engine_with(
    matching: MatchingConfig,
    notifications: NotificationsConfig,
) -> TestEngine {
    let directory = Arc::new(emberly_outbound::directory::MemoryUserDirectory::new());
    let swipes = Arc::new(MemorySwipeStore::new());
    let matches = Arc::new(MemoryMatchStore::new());
    let store = Arc::new(MemoryNotificationStore::new());
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let ledger = Arc::new(MemoryDeliveryLedger::new());
    let push = Arc::new(RecordingSender::new(Channel::Push));
    let email = Arc::new(RecordingSender::new(Channel::Email));

    let (outbox, events) = EventOutbox::channel();

    let dispatcher = ChannelDispatcher::new(
        Arc::clone(&ledger) as _,
        vec![Arc::clone(&push) as _, Arc::clone(&email) as _],
        notifications.clone(),
    );
    let notifier = Arc::new(Notifier::new(
        Arc::clone(&store) as _,
        Arc::clone(&prefs) as _,
        dispatcher,
        notifications.clone(),
    ));

    let swipe_service = SwipeService::new(
        Arc::clone(&swipes) as _,
        Arc::clone(&matches) as _,
        Arc::clone(&prefs) as _,
        Arc::clone(&directory) as _,
        outbox,
        matching,
    );
    let notification_service = NotificationService::new(
        Arc::clone(&store) as _,
        Arc::clone(&prefs) as _,
        notifications,
    );

    TestEngine {
        directory,
        swipes,
        matches,
        store,
        prefs,
        ledger,
        push,
        email,
        swipe_service,
        notification_service,
        notifier,
        events,
    }
}

/// Default test engine: 1 ms retry backoff, standard policy otherwise.
pub fn engine() -> TestEngine {
    engine_with(
        MatchingConfig::default(),
        NotificationsConfig {
            retry_backoff_ms: 1,
            ..NotificationsConfig::default()
        },
    )
}

impl TestEngine {
    /// Seed a user who accepts everyone nearby.
    pub fn seed_user(&self, user: UserId) {
        self.directory.insert_user(
            Profile {
                user_id: user,
                display_name: format!("user-{user}"),
                age: 30,
                gender: Gender::Female,
                location: GeoPoint::new(52.52, 13.405),
                interests: ["hiking", "jazz"].iter().map(|s| s.to_string()).collect(),
                last_active_at: Utc::now(),
            },
            DiscoveryPreferences {
                age_min: 20,
                age_max: 40,
                max_distance_km: 100.0,
                interested_in: vec![Gender::Female, Gender::Male, Gender::Nonbinary],
            },
        );
    }

    /// Drain every event currently in the outbox.
    pub fn drain_events(&mut self) -> Vec<DomainEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// Drain the outbox and run the pipeline for each event at `now`.
    pub async fn pump(&mut self, now: DateTime<Utc>) -> Vec<DomainEvent> {
        let drained = self.drain_events();
        for event in &drained {
            self.notifier
                .handle_event(event, now)
                .await
                .expect("pipeline should not error");
        }
        drained
    }
}

/// Parse a fixed UTC timestamp.
pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid timestamp")
}
