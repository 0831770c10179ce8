use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, instrument, warn};

use super::events::{BusEvent, EventId, PlaybackEvent, RoomMetadata};
use crate::room::RoomId;

/// Stream of newly appended room entries, in append order
pub type EventStream = BoxStream<'static, BusEvent>;

/// Errors reported by the event bus client
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BusError {
    #[error("Room {0} does not exist")]
    RoomNotFound(RoomId),

    #[error("Room {0} already exists")]
    RoomExists(RoomId),

    #[error("Bus unavailable: {0}")]
    Unavailable(String),
}

/// Room-scoped, append-only event log with push delivery of new entries
///
/// Delivery is at-least-once and strictly ordered within a room. Every
/// subscriber of a room, including the publisher, receives each entry.
#[async_trait]
pub trait EventBusClient: Send + Sync {
    async fn publish(&self, room_id: &RoomId, event: PlaybackEvent) -> Result<EventId, BusError>;

    /// Subscribe to entries appended after this call returns
    async fn subscribe_new_events(&self, room_id: &RoomId) -> Result<EventStream, BusError>;

    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, BusError>;

    async fn create_room(&self, room_id: &RoomId, metadata: RoomMetadata) -> Result<(), BusError>;

    async fn touch_activity(&self, room_id: &RoomId) -> Result<(), BusError>;
}

struct RoomLog {
    metadata: RoomMetadata,
    events: Vec<BusEvent>,
    sender: broadcast::Sender<BusEvent>,
}

impl RoomLog {
    fn new(metadata: RoomMetadata, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            metadata,
            events: Vec::new(),
            sender,
        }
    }

    fn next_event_id(&self) -> EventId {
        self.events.last().map(|e| e.event_id + 1).unwrap_or(1)
    }
}

/// In-process event bus backed by per-room broadcast channels
#[derive(Clone)]
pub struct InMemoryEventBus {
    rooms: Arc<RwLock<HashMap<RoomId, RoomLog>>>,
    available: Arc<AtomicBool>,
    capacity: usize,
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a bus whose per-room channels buffer up to `capacity` undelivered events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
            capacity,
        }
    }

    /// Simulates the bus going away (or coming back); every call fails while unavailable
    pub fn set_available(&self, available: bool) {
        info!(available, "Changing in-memory bus availability");
        self.available.store(available, Ordering::SeqCst);
    }

    /// Full log of a room, oldest first
    pub async fn events(&self, room_id: &RoomId) -> Vec<BusEvent> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map(|log| log.events.clone())
            .unwrap_or_default()
    }

    pub async fn metadata(&self, room_id: &RoomId) -> Option<RoomMetadata> {
        self.rooms.read().await.get(room_id).map(|log| log.metadata)
    }

    /// Number of live subscriptions on a room
    pub async fn subscriber_count(&self, room_id: &RoomId) -> usize {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map(|log| log.sender.receiver_count())
            .unwrap_or(0)
    }

    /// Re-sends an already stored entry, as an at-least-once transport may do
    pub async fn redeliver(&self, room_id: &RoomId, event_id: EventId) -> Result<(), BusError> {
        self.ensure_available()?;
        let rooms = self.rooms.read().await;
        let log = rooms
            .get(room_id)
            .ok_or_else(|| BusError::RoomNotFound(room_id.clone()))?;

        if let Some(entry) = log.events.iter().find(|e| e.event_id == event_id) {
            debug!(room_id = %room_id, event_id, "Redelivering room event");
            let _ = log.sender.send(entry.clone());
        }
        Ok(())
    }

    fn ensure_available(&self) -> Result<(), BusError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BusError::Unavailable("in-memory bus switched off".to_string()))
        }
    }
}

#[async_trait]
impl EventBusClient for InMemoryEventBus {
    #[instrument(skip(self, event))]
    async fn publish(&self, room_id: &RoomId, event: PlaybackEvent) -> Result<EventId, BusError> {
        self.ensure_available()?;

        let mut rooms = self.rooms.write().await;
        let log = rooms
            .get_mut(room_id)
            .ok_or_else(|| BusError::RoomNotFound(room_id.clone()))?;

        let entry = BusEvent {
            event_id: log.next_event_id(),
            room_id: room_id.clone(),
            event,
        };
        log.events.push(entry.clone());

        match log.sender.send(entry.clone()) {
            Ok(receiver_count) => {
                debug!(
                    room_id = %room_id,
                    event_id = entry.event_id,
                    receivers = receiver_count,
                    "Room event published"
                );
            }
            Err(_) => {
                debug!(room_id = %room_id, "Room event published with no receivers");
            }
        }

        Ok(entry.event_id)
    }

    #[instrument(skip(self))]
    async fn subscribe_new_events(&self, room_id: &RoomId) -> Result<EventStream, BusError> {
        self.ensure_available()?;

        let receiver = {
            let rooms = self.rooms.read().await;
            let log = rooms
                .get(room_id)
                .ok_or_else(|| BusError::RoomNotFound(room_id.clone()))?;
            log.sender.subscribe()
        };

        debug!(room_id = %room_id, "Subscribed to room events");
        let room_id = room_id.clone();

        let events = stream::unfold(receiver, move |mut receiver| {
            let room_id = room_id.clone();
            async move {
                loop {
                    match receiver.recv().await {
                        Ok(event) => return Some((event, receiver)),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(room_id = %room_id, skipped, "Room subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        });

        Ok(events.boxed())
    }

    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, BusError> {
        self.ensure_available()?;
        Ok(self.rooms.read().await.contains_key(room_id))
    }

    #[instrument(skip(self))]
    async fn create_room(&self, room_id: &RoomId, metadata: RoomMetadata) -> Result<(), BusError> {
        self.ensure_available()?;

        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(room_id) {
            warn!(room_id = %room_id, "Room already exists on bus");
            return Err(BusError::RoomExists(room_id.clone()));
        }
        rooms.insert(room_id.clone(), RoomLog::new(metadata, self.capacity));

        info!(room_id = %room_id, "Room created on bus");
        Ok(())
    }

    async fn touch_activity(&self, room_id: &RoomId) -> Result<(), BusError> {
        self.ensure_available()?;

        let mut rooms = self.rooms.write().await;
        let log = rooms
            .get_mut(room_id)
            .ok_or_else(|| BusError::RoomNotFound(room_id.clone()))?;
        log.metadata.last_activity_ms = log
            .metadata
            .last_activity_ms
            .max(chrono::Utc::now().timestamp_millis());
        Ok(())
    }
}
