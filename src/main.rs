//! # Giveaway Bot Main Entry Point
//!
//! Initializes logging, loads configuration, opens the draft store, starts
//! the publication scheduler and the health server, and runs the Telegram
//! bot until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use giveaway_bot::api::{ApiClient, Backend};
use giveaway_bot::bot::handlers::BotHandler;
use giveaway_bot::config::Config;
use giveaway_bot::conversation::{AlbumGuard, Conversation};
use giveaway_bot::drafts::{DraftStore, Drafts, InMemoryDraftStore, SqliteDraftStore};
use giveaway_bot::platform::{Messenger, TelegramMessenger};
use giveaway_bot::services::dispatcher::PublicationDispatcher;
use giveaway_bot::services::health::HealthService;
use giveaway_bot::services::membership::MembershipGuard;
use giveaway_bot::services::scheduler::{PublicationScheduler, SchedulerService};
use giveaway_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giveaway_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Giveaway Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - API: {}, Drafts: {}, HTTP Port: {}, Schedule: '{}'",
        config.api_url, config.draft_store_url, config.http_port, config.sweep_schedule
    );

    // Draft store
    let (draft_store, sqlite_store): (Arc<dyn DraftStore>, Option<Arc<SqliteDraftStore>>) =
        if config.uses_memory_drafts() {
            info!("Keeping drafts in memory; unfinished drafts are lost on restart");
            (Arc::new(InMemoryDraftStore::new()), None)
        } else {
            info!("Opening draft store...");
            let store = SqliteDraftStore::new(&config.draft_store_url).await?;
            store.run_migrations().await?;
            let store = Arc::new(store);
            let shared: Arc<dyn DraftStore> = store.clone();
            (shared, Some(store))
        };

    // Collaborators
    let bot = Bot::new(&config.telegram_bot_token);
    let backend: Arc<dyn Backend> = Arc::new(ApiClient::new(&config.api_url)?);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let conversation = Arc::new(Conversation::new(
        backend.clone(),
        messenger.clone(),
        Drafts::new(draft_store),
        AlbumGuard::default(),
    ));
    let membership = Arc::new(MembershipGuard::new(backend.clone(), messenger.clone()));
    let handler = BotHandler::new(conversation, membership);

    // Publication scheduler
    let dispatcher = Arc::new(PublicationDispatcher::new(messenger));
    let publication = Arc::new(PublicationScheduler::new(backend, dispatcher));
    let mut scheduler_service = SchedulerService::new(publication)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create publication scheduler: {}", e))?;

    if let Err(e) = scheduler_service.start(&config.sweep_schedule).await {
        tracing::error!("Failed to start publication scheduler: {}", e);
        return Err(anyhow::anyhow!("Failed to start publication scheduler: {}", e));
    }

    // Health server
    let health_service = HealthService::new(sqlite_store);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    log_system_event("started", None);

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    // In-flight sweeps finish before the scheduler returns
    if let Err(e) = scheduler_service.stop().await {
        tracing::warn!("Error stopping publication scheduler: {}", e);
    }

    log_system_event("stopped", None);
    Ok(())
}
