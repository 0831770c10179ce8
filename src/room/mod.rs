// Public API - what other modules can use
pub use activity_tracker::ActivityTracker;
pub use broadcaster::{ActiveRoom, RoomBroadcaster, SessionBroadcaster};
pub use generators::{FixedRoomCodeGenerator, RandomRoomCodeGenerator, RoomCodeGenerator};
pub use handlers::{create_room, current_room, join_room, leave_room};
pub use models::{RoomId, ROOM_CODE_LEN};
pub use service::RoomSessionManager;

// Internal modules
mod activity_tracker;
mod broadcaster;
mod generators;
mod handlers;
pub mod models;
mod service;
pub mod types;
