// Event bus boundary and room-scoped delivery
//
// The bus itself is an external collaborator; this module defines the
// contract the rest of the crate talks to, an in-process implementation, and
// the plumbing that routes a room's deliveries to player instances.

// Public API - what other modules can use
pub use bus::{BusError, EventBusClient, EventStream, InMemoryEventBus};
pub use dispatcher::EventDispatcher;
pub use events::{BusEvent, EventId, OriginId, PlaybackEvent, PlaybackKind, RoomMetadata};
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_subscription::RoomSubscription;

// Internal modules
mod bus;
mod dispatcher;
mod events;
mod room_handler;
mod room_subscription;
