// Library crate for the watch party sync service
// This file exposes the public API for integration tests

pub mod app;
pub mod auth;
pub mod config;
pub mod event;
pub mod player;
pub mod room;
pub mod shared;
pub mod sync;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::{AppConfig, SyncConfig};
pub use event::{BusEvent, EventBusClient, InMemoryEventBus, PlaybackEvent, PlaybackKind};
pub use player::{PlayerAdapter, PlayerNotification, SimulatedPlayer};
pub use room::{RoomId, RoomSessionManager};
pub use shared::{AppError, AppState};
pub use sync::{ApplyState, LocalOutcome, ReconciliationEngine, RemoteOutcome};
