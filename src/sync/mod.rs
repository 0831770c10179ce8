// Public API - what other modules can use
pub use echo_cache::EchoCache;
pub use engine::ReconciliationEngine;
pub use handlers::{broadcast, player_status, sync_now};
pub use state::{ApplyState, LocalOutcome, RemoteOutcome};
pub use throttle::SeekThrottle;

// Internal modules
mod echo_cache;
mod engine;
mod handlers;
mod state;
mod throttle;
pub mod types;
