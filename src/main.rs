//! Emberly Server — Matching & Notification Engine
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use emberly_core::config::AppConfig;
use emberly_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("EMBERLY_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Emberly v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let swipe_store: Arc<dyn emberly_store::SwipeStore> =
        Arc::new(emberly_store::memory::MemorySwipeStore::new());
    let match_store: Arc<dyn emberly_store::MatchStore> =
        Arc::new(emberly_store::memory::MemoryMatchStore::new());
    let notification_store: Arc<dyn emberly_store::NotificationStore> =
        Arc::new(emberly_store::memory::MemoryNotificationStore::new());
    let preference_store: Arc<dyn emberly_store::PreferenceStore> =
        Arc::new(emberly_store::memory::MemoryPreferenceStore::new());
    let delivery_ledger: Arc<dyn emberly_store::DeliveryLedger> =
        Arc::new(emberly_store::memory::MemoryDeliveryLedger::new());
    tracing::info!("Stores initialized");

    // ── Step 2: Outbound services ────────────────────────────────
    tracing::info!(
        "Initializing directory (provider: {})...",
        config.outbound.directory_provider
    );
    let directory = emberly_outbound::build_directory(&config.outbound)?;

    let mut senders: Vec<Arc<dyn emberly_outbound::ChannelSender>> = Vec::new();
    if config.outbound.push.enabled {
        senders.push(Arc::new(emberly_outbound::senders::HttpPushSender::new(
            &config.outbound.push,
        )?));
    }
    if config.outbound.email.enabled {
        senders.push(Arc::new(emberly_outbound::senders::HttpEmailSender::new(
            &config.outbound.email,
        )?));
    }
    tracing::info!(channels = senders.len(), "Channel senders initialized");

    // ── Step 3: Engine ───────────────────────────────────────────
    let (outbox, outbox_rx) = emberly_engine::EventOutbox::channel();

    let dispatcher = emberly_engine::notification::ChannelDispatcher::new(
        Arc::clone(&delivery_ledger),
        senders,
        config.notifications.clone(),
    );
    let notifier = Arc::new(emberly_engine::notification::Notifier::new(
        Arc::clone(&notification_store),
        Arc::clone(&preference_store),
        dispatcher,
        config.notifications.clone(),
    ));

    let ranker = Arc::new(emberly_engine::discovery::CandidateRanker::new(
        Arc::clone(&directory),
        Arc::clone(&swipe_store),
        config.matching.clone(),
    ));
    let swipe_service = Arc::new(emberly_engine::swipe::SwipeService::new(
        Arc::clone(&swipe_store),
        Arc::clone(&match_store),
        Arc::clone(&preference_store),
        Arc::clone(&directory),
        outbox.clone(),
        config.matching.clone(),
    ));
    let notification_service = Arc::new(emberly_engine::notification::NotificationService::new(
        Arc::clone(&notification_store),
        Arc::clone(&preference_store),
        config.notifications.clone(),
    ));
    tracing::info!("Engine services initialized");

    // ── Step 4: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Background worker ────────────────────────────────
    let (worker_handle, mut scheduler) = if config.worker.enabled {
        tracing::info!("Starting background worker...");

        let dispatch_worker = emberly_worker::DispatchWorker::new(
            Arc::clone(&notifier),
            config.worker.clone(),
        );
        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            dispatch_worker.run(outbox_rx, worker_cancel).await;
        });

        let scheduler = emberly_worker::CronScheduler::new().await?;
        scheduler
            .register(Arc::new(emberly_worker::jobs::BatchFlushJob::new(
                Arc::clone(&notifier),
            )))
            .await?;
        scheduler
            .register(Arc::new(emberly_worker::jobs::DeferredReleaseJob::new(
                Arc::clone(&notifier),
            )))
            .await?;
        scheduler
            .register(Arc::new(emberly_worker::jobs::RetentionJob::new(
                Arc::clone(&notification_store),
                config.notifications.clone(),
            )))
            .await?;
        scheduler.start().await?;

        tracing::info!("Background worker started");
        (Some(handle), Some(scheduler))
    } else {
        tracing::info!("Background worker disabled");
        (None, None)
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let app_state = emberly_api::AppState {
        config: Arc::new(config.clone()),
        ranker,
        swipe_service,
        notification_service,
        notifier: Arc::clone(&notifier),
        outbox,
    };

    let app = emberly_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Emberly server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for background tasks ────────────────────────
    tracing::info!("Waiting for background tasks to complete...");

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    tracing::info!("Emberly server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
