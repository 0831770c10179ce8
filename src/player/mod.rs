// Public API - what other modules can use
pub use adapter::{PlaybackError, PlayerAdapter, PlayerNotification, PlayerSnapshot};
pub use pump::spawn_notification_pump;
pub use simulated::{PlayerCommand, SimulatedPlayer};

// Internal modules
mod adapter;
mod pump;
mod simulated;
