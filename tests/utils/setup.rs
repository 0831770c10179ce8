#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;
use tokio::task::JoinHandle;

use axum::Router;
use watchsync::{
    auth::{LocalIdentityProvider, ViewerNameGenerator, TokenConfig},
    build_router,
    player::spawn_notification_pump,
    room::FixedRoomCodeGenerator,
    AppState, InMemoryEventBus, ReconciliationEngine, RoomId, RoomSessionManager, SimulatedPlayer,
    SyncConfig,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// One viewer: a session, its engine and a simulated player feeding it
pub struct Peer {
    pub name: String,
    pub manager: Arc<RoomSessionManager>,
    pub engine: Arc<ReconciliationEngine>,
    pub player: Arc<SimulatedPlayer>,
    pub _pump: JoinHandle<()>,
}

impl Peer {
    /// The control surface for this peer's session
    pub fn router(&self) -> Router {
        let identity = Arc::new(LocalIdentityProvider::new(
            TokenConfig::with_secret("test-secret", 1),
            Arc::new(ViewerNameGenerator::new()),
        ));
        build_router(AppState::new(
            self.manager.clone(),
            self.engine.clone(),
            self.player.clone(),
            identity,
        ))
    }
}

pub struct TestSetup {
    pub bus: Arc<InMemoryEventBus>,
    pub config: SyncConfig,
    pub peers: Vec<Peer>,
}

impl TestSetup {
    pub fn peer(&self, name: &str) -> &Peer {
        self.peers
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("no peer named {}", name))
    }
}

pub struct TestSetupBuilder {
    peers: Vec<String>,
    room_codes: Vec<String>,
    config: SyncConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            peers: vec![],
            room_codes: vec!["AB3K".to_string()],
            config: SyncConfig::default(),
        }
    }

    pub fn with_peers(mut self, peers: Vec<&str>) -> Self {
        self.peers = peers.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_peers(self) -> Self {
        self.with_peers(vec!["alice", "bob"])
    }

    /// Codes handed out, in order, to every peer that creates a room
    pub fn with_room_codes(mut self, codes: Vec<&str>) -> Self {
        self.room_codes = codes.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> TestSetup {
        let bus = Arc::new(InMemoryEventBus::new());
        let codes: Vec<RoomId> = self
            .room_codes
            .iter()
            .map(|code| RoomId::parse(code).unwrap())
            .collect();

        let mut peers = Vec::new();
        for name in self.peers {
            let manager = Arc::new(RoomSessionManager::new(
                bus.clone(),
                Arc::new(FixedRoomCodeGenerator::sequence(codes.clone())),
                &self.config,
            ));

            let (player, notifications) = SimulatedPlayer::with_notifications();
            let player = Arc::new(player);
            let engine = Arc::new(ReconciliationEngine::new(
                player.clone(),
                manager.broadcaster(),
                self.config.clone(),
            ));
            manager.attach_player(engine.clone()).await;
            let pump = spawn_notification_pump(engine.clone(), notifications);

            peers.push(Peer {
                name,
                manager,
                engine,
                player,
                _pump: pump,
            });
        }

        TestSetup {
            bus,
            config: self.config,
            peers,
        }
    }
}
