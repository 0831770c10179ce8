use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{
    activity_tracker::ActivityTracker,
    broadcaster::{ActiveRoom, RoomBroadcaster, RoomSlot, SessionBroadcaster},
    generators::RoomCodeGenerator,
    models::RoomId,
};
use crate::config::SyncConfig;
use crate::event::{
    BusError, EventBusClient, EventDispatcher, EventId, PlaybackEvent, RoomEventHandler,
    RoomMetadata, RoomSubscription,
};
use crate::shared::AppError;

/// Owns the lifecycle of a session's current room
///
/// A session is in at most one room at a time and holds exactly one bus
/// subscription for it. Deliveries go through an [`EventDispatcher`] so any
/// number of player instances can be attached to the same session.
pub struct RoomSessionManager {
    bus: Arc<dyn EventBusClient>,
    code_generator: Arc<dyn RoomCodeGenerator>,
    dispatcher: Arc<EventDispatcher>,
    slot: RoomSlot,
    broadcaster: Arc<SessionBroadcaster>,
    activity_tracker: ActivityTracker,
}

impl RoomSessionManager {
    pub fn new(
        bus: Arc<dyn EventBusClient>,
        code_generator: Arc<dyn RoomCodeGenerator>,
        config: &SyncConfig,
    ) -> Self {
        let slot: RoomSlot = Arc::new(RwLock::new(None));
        let dispatcher =
            Arc::new(EventDispatcher::new().with_handler_timeout(config.dispatch_timeout()));

        Self {
            broadcaster: Arc::new(SessionBroadcaster::new(slot.clone(), bus.clone())),
            activity_tracker: ActivityTracker::new(bus.clone()),
            bus,
            code_generator,
            dispatcher,
            slot,
        }
    }

    /// Publishing seam for reconciliation engines of this session
    pub fn broadcaster(&self) -> Arc<dyn RoomBroadcaster> {
        self.broadcaster.clone()
    }

    /// Attach a player instance so it receives this session's room deliveries
    pub async fn attach_player(&self, handler: Arc<dyn RoomEventHandler>) {
        self.dispatcher.add_handler(handler).await;
    }

    pub async fn attached_players(&self) -> usize {
        self.dispatcher.handler_count().await
    }

    pub async fn current_room(&self) -> Option<RoomId> {
        self.broadcaster.current_room().await
    }

    /// Current room and the wall-clock ms at which it became active
    pub async fn current_room_details(&self) -> Option<(RoomId, i64)> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|active| (active.room_id.clone(), active.joined_at_ms))
    }

    /// Creates a room under a freshly generated code and makes it current
    #[instrument(skip(self))]
    pub async fn create_room(&self) -> Result<RoomId, AppError> {
        let room_id = self.code_generator.generate();
        debug!(room_id = %room_id, "Generated room code");

        let metadata = RoomMetadata::new(chrono::Utc::now().timestamp_millis());
        self.bus
            .create_room(&room_id, metadata)
            .await
            .map_err(|e| {
                warn!(room_id = %room_id, error = %e, "Bus rejected room creation");
                AppError::RoomCreateFailed(e.to_string())
            })?;

        self.switch_to(room_id.clone())
            .await
            .map_err(|e| AppError::RoomCreateFailed(e.to_string()))?;

        info!(room_id = %room_id, "Room created successfully");
        Ok(room_id)
    }

    /// Joins an existing room; on failure the previous room stays active
    #[instrument(skip(self))]
    pub async fn join_room(&self, code: &str) -> Result<RoomId, AppError> {
        let room_id = RoomId::parse(code)?;

        let exists = self
            .bus
            .room_exists(&room_id)
            .await
            .map_err(|e| AppError::BusUnavailable(e.to_string()))?;
        if !exists {
            info!(room_id = %room_id, "Join target does not exist");
            return Err(AppError::RoomNotFound(room_id.to_string()));
        }

        self.activity_tracker.record_activity(&room_id).await;

        if self.current_room().await.as_ref() == Some(&room_id) {
            debug!(room_id = %room_id, "Already in room, keeping subscription");
            return Ok(room_id);
        }

        self.switch_to(room_id.clone()).await.map_err(|e| match e {
            BusError::RoomNotFound(room) => AppError::RoomNotFound(room.to_string()),
            other => AppError::BusUnavailable(other.to_string()),
        })?;

        info!(room_id = %room_id, "Joined room successfully");
        Ok(room_id)
    }

    /// Leaves the current room; a no-op when there is none
    #[instrument(skip(self))]
    pub async fn leave_room(&self) -> Result<(), AppError> {
        let mut slot = self.slot.write().await;

        match slot.take() {
            Some(previous) => {
                let room_id = previous.room_id.clone();
                self.teardown(previous).await;
                info!(room_id = %room_id, "Left room successfully");
            }
            None => debug!("Leave requested with no active room"),
        }

        Ok(())
    }

    /// Publishes an event to the current room
    pub async fn broadcast(&self, event: PlaybackEvent) -> Result<EventId, AppError> {
        self.broadcaster.broadcast(event).await
    }

    /// Subscribe to `room_id`, then retire the previous room
    ///
    /// The slot's write lock is taken before subscribing and held for the
    /// whole swap: readers never observe a session without a room, and
    /// entries the new subscription delivers early wait for the swap instead
    /// of being judged against the previous room. On failure the previous
    /// room stays active.
    async fn switch_to(&self, room_id: RoomId) -> Result<(), BusError> {
        let mut slot = self.slot.write().await;

        let subscription =
            RoomSubscription::start(self.bus.as_ref(), room_id.clone(), self.dispatcher.clone())
                .await?;

        if let Some(previous) = slot.take() {
            self.teardown(previous).await;
        }

        *slot = Some(ActiveRoom {
            room_id,
            subscription,
            joined_at_ms: chrono::Utc::now().timestamp_millis(),
        });

        Ok(())
    }

    /// Unsubscribe first, then let attached players drop room-scoped state
    async fn teardown(&self, previous: ActiveRoom) {
        let ActiveRoom {
            room_id,
            subscription,
            ..
        } = previous;

        subscription.cancel().await;
        self.dispatcher.on_room_left(&room_id).await;
    }
}
