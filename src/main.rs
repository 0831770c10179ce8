use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchsync::{
    auth::{LocalIdentityProvider, ViewerNameGenerator, TokenConfig},
    build_router,
    player::spawn_notification_pump,
    room::RandomRoomCodeGenerator,
    AppConfig, AppState, InMemoryEventBus, ReconciliationEngine, RoomSessionManager,
    SimulatedPlayer,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchsync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(
        bind_addr = %config.bind_addr,
        guard_delay_ms = config.sync.guard_delay.as_millis() as u64,
        seek_throttle_ms = config.sync.seek_throttle.as_millis() as u64,
        "Starting watch party sync service"
    );

    let bus = Arc::new(InMemoryEventBus::new());
    let room_manager = Arc::new(RoomSessionManager::new(
        bus,
        Arc::new(RandomRoomCodeGenerator::new()),
        &config.sync,
    ));

    let (player, notifications) = SimulatedPlayer::with_notifications();
    let player = Arc::new(player);
    let engine = Arc::new(ReconciliationEngine::new(
        player.clone(),
        room_manager.broadcaster(),
        config.sync.clone(),
    ));
    room_manager.attach_player(engine.clone()).await;
    let _pump = spawn_notification_pump(engine.clone(), notifications);

    let identity = Arc::new(LocalIdentityProvider::new(
        TokenConfig::from_env(),
        Arc::new(ViewerNameGenerator::new()),
    ));

    let app_state = AppState::new(room_manager, engine, player, identity);
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await
}
