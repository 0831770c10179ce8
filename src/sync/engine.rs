use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, instrument, warn};

use super::{
    echo_cache::EchoCache,
    state::{ApplyState, LocalOutcome, RemoteOutcome},
    throttle::SeekThrottle,
};
use crate::config::SyncConfig;
use crate::event::{
    BusEvent, EventId, OriginId, PlaybackEvent, PlaybackKind, RoomEventError, RoomEventHandler,
};
use crate::player::{PlaybackError, PlayerAdapter, PlayerNotification};
use crate::room::{RoomBroadcaster, RoomId};
use crate::shared::AppError;

struct EngineState {
    apply_state: ApplyState,
    release_generation: u64,
    release_task: Option<JoinHandle<()>>,
    recently_published: EchoCache,
    seek_throttle: SeekThrottle,
    last_emitted_ms: i64,
    tracked_room: Option<RoomId>,
    last_seen_event_id: Option<EventId>,
}

impl EngineState {
    /// Wall-clock marker for a new local event, strictly increasing per engine
    fn next_emitted_ms(&mut self, now_ms: i64) -> i64 {
        let emitted = now_ms.max(self.last_emitted_ms + 1);
        self.last_emitted_ms = emitted;
        emitted
    }

    fn abort_release(&mut self) {
        if let Some(task) = self.release_task.take() {
            task.abort();
        }
    }
}

/// Decides, per player instance, what to publish and what to apply
///
/// Outbound: local player notifications become [`PlaybackEvent`]s unless a
/// remote command is being applied or a seek arrives inside the throttle
/// window. Inbound: bus deliveries are dropped when they are this engine's
/// own echoes, redeliveries, or late arrivals for a room the session left;
/// everything else is applied to the player, and local notifications stay
/// suppressed until a guard delay after the player settles.
pub struct ReconciliationEngine {
    origin_id: OriginId,
    player: Arc<dyn PlayerAdapter>,
    broadcaster: Arc<dyn RoomBroadcaster>,
    config: SyncConfig,
    state: Arc<Mutex<EngineState>>,
}

impl ReconciliationEngine {
    pub fn new(
        player: Arc<dyn PlayerAdapter>,
        broadcaster: Arc<dyn RoomBroadcaster>,
        config: SyncConfig,
    ) -> Self {
        let state = EngineState {
            apply_state: ApplyState::Idle,
            release_generation: 0,
            release_task: None,
            recently_published: EchoCache::new(config.echo_window),
            seek_throttle: SeekThrottle::new(config.seek_throttle),
            last_emitted_ms: 0,
            tracked_room: None,
            last_seen_event_id: None,
        };

        Self {
            origin_id: OriginId::new(),
            player,
            broadcaster,
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn origin_id(&self) -> OriginId {
        self.origin_id
    }

    pub async fn apply_state(&self) -> ApplyState {
        self.state.lock().await.apply_state
    }

    /// Number of self-published markers still inside the echo window
    pub async fn pending_echoes(&self) -> usize {
        self.state.lock().await.recently_published.len()
    }

    /// Outbound path for a settled local player action
    ///
    /// Publish failures are logged and reported in the outcome, never raised.
    #[instrument(skip(self), fields(origin_id = %self.origin_id))]
    pub async fn on_local_player_event(&self, notification: PlayerNotification) -> LocalOutcome {
        if self.broadcaster.current_room().await.is_none() {
            debug!("Ignoring local player event (not in a room)");
            return LocalOutcome::NotInRoom;
        }

        let kind = notification.kind();
        let event = {
            let mut state = self.state.lock().await;

            if state.apply_state == ApplyState::ApplyingRemote {
                debug!(kind = %kind, "Ignoring local player event (applying remote)");
                return LocalOutcome::ApplyingRemote;
            }

            let now = Instant::now();
            if kind == PlaybackKind::Seek && !state.seek_throttle.try_accept(now) {
                debug!("Dropping local seek (throttled)");
                return LocalOutcome::Throttled;
            }

            let emitted_at_ms = state.next_emitted_ms(chrono::Utc::now().timestamp_millis());
            state.recently_published.insert(emitted_at_ms, now);

            PlaybackEvent::new(
                kind,
                sanitize_position(notification.position_seconds()),
                self.origin_id,
                emitted_at_ms,
            )
        };

        self.publish(event).await
    }

    /// Rebroadcast the player's current position and play state as a `Sync`
    #[instrument(skip(self), fields(origin_id = %self.origin_id))]
    pub async fn sync_now(&self) -> LocalOutcome {
        if self.broadcaster.current_room().await.is_none() {
            return LocalOutcome::NotInRoom;
        }

        let snapshot = self.player.snapshot().await;
        let event = {
            let mut state = self.state.lock().await;

            if state.apply_state == ApplyState::ApplyingRemote {
                debug!("Skipping manual sync (applying remote)");
                return LocalOutcome::ApplyingRemote;
            }

            let emitted_at_ms = state.next_emitted_ms(chrono::Utc::now().timestamp_millis());
            state.recently_published.insert(emitted_at_ms, Instant::now());

            PlaybackEvent::sync(
                sanitize_position(snapshot.position_seconds),
                !snapshot.paused,
                self.origin_id,
                emitted_at_ms,
            )
        };

        info!(
            position_seconds = event.position_seconds,
            should_play = ?event.should_play,
            "Broadcasting manual sync"
        );
        self.publish(event).await
    }

    async fn publish(&self, event: PlaybackEvent) -> LocalOutcome {
        let kind = event.kind;
        match self.broadcaster.broadcast(event).await {
            Ok(event_id) => {
                debug!(kind = %kind, event_id, "Local player event published");
                LocalOutcome::Published(event_id)
            }
            Err(AppError::NotInRoom) => {
                debug!(kind = %kind, "Room left before local event could be published");
                LocalOutcome::NotInRoom
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to publish local player event");
                LocalOutcome::PublishFailed
            }
        }
    }

    /// Inbound path for one bus delivery
    #[instrument(skip(self, delivery), fields(
        origin_id = %self.origin_id,
        room_id = %delivery.room_id,
        event_id = delivery.event_id
    ))]
    pub async fn on_remote_event(&self, delivery: BusEvent) -> RemoteOutcome {
        let BusEvent {
            event_id,
            room_id,
            event,
        } = delivery;

        if !event.has_valid_position() {
            warn!(position = event.position_seconds, "Rejecting remote event with invalid position");
            return RemoteOutcome::Invalid;
        }

        // Read before locking our own state; the session holds its lock while notifying us
        let current_room = self.broadcaster.current_room().await;
        if current_room.as_ref() != Some(&room_id) {
            debug!("Ignoring event for a room this session is not in");
            return RemoteOutcome::StaleRoom;
        }

        let pending_release = {
            let mut state = self.state.lock().await;

            if state.tracked_room.as_ref() != Some(&room_id) {
                state.tracked_room = Some(room_id.clone());
                state.last_seen_event_id = None;
            }

            if matches!(state.last_seen_event_id, Some(last) if event_id <= last) {
                debug!("Ignoring redelivered event");
                return RemoteOutcome::Duplicate;
            }
            state.last_seen_event_id = Some(event_id);

            if event.origin_id == self.origin_id
                && state
                    .recently_published
                    .contains(event.emitted_at_ms, Instant::now())
            {
                debug!(emitted_at_ms = event.emitted_at_ms, "Ignoring own event");
                return RemoteOutcome::SelfEcho;
            }

            state.apply_state = ApplyState::ApplyingRemote;
            state.release_generation += 1;
            state.abort_release();

            PendingRelease {
                state: Arc::clone(&self.state),
                generation: state.release_generation,
                guard_delay: self.config.guard_delay,
                armed: true,
            }
        };

        info!(
            kind = %event.kind,
            position_seconds = event.position_seconds,
            "Applying remote command"
        );

        let result = match timeout(self.config.play_timeout, self.apply(&event)).await {
            Ok(result) => result,
            Err(_) => Err(PlaybackError::Other("player did not settle in time".to_string())),
        };

        self.schedule_release().await;
        pending_release.disarm();

        match result {
            Ok(()) => RemoteOutcome::Applied,
            Err(e) => {
                error!(
                    kind = %event.kind,
                    error = %AppError::PlaybackCommandFailed(e.to_string()),
                    "Remote command failed on player"
                );
                RemoteOutcome::PlaybackFailed
            }
        }
    }

    async fn apply(&self, event: &PlaybackEvent) -> Result<(), PlaybackError> {
        match event.kind {
            PlaybackKind::Play => {
                self.seek_best_effort(event.position_seconds).await;
                self.player.play().await
            }
            PlaybackKind::Pause => self.player.pause().await,
            PlaybackKind::Seek => self.player.seek(event.position_seconds).await,
            PlaybackKind::Sync => {
                self.seek_best_effort(event.position_seconds).await;
                match event.should_play {
                    Some(true) => self.player.play().await,
                    Some(false) => self.player.pause().await,
                    None => {
                        warn!("Sync event without shouldPlay, position applied only");
                        Ok(())
                    }
                }
            }
        }
    }

    async fn seek_best_effort(&self, position_seconds: f64) {
        if let Err(e) = self.player.seek(position_seconds).await {
            warn!(position_seconds, error = %e, "Seek before play state change failed");
        }
    }

    /// Return to Idle one guard delay from now, replacing any pending release
    async fn schedule_release(&self) {
        let mut state = self.state.lock().await;
        let task = tokio::spawn(release_after(
            Arc::clone(&self.state),
            state.release_generation,
            self.config.guard_delay,
        ));

        state.abort_release();
        state.release_task = Some(task);
    }

    /// Forget everything scoped to the room that was just left
    #[instrument(skip(self), fields(origin_id = %self.origin_id))]
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.abort_release();
        state.release_generation += 1;
        state.apply_state = ApplyState::Idle;
        state.recently_published.clear();
        state.tracked_room = None;
        state.last_seen_event_id = None;
        debug!("Reconciliation state reset");
    }
}

/// Clears the apply guard after `guard_delay` unless a newer remote event took over
async fn release_after(state: Arc<Mutex<EngineState>>, generation: u64, guard_delay: Duration) {
    sleep(guard_delay).await;
    let mut state = state.lock().await;
    if state.release_generation == generation {
        state.apply_state = ApplyState::Idle;
        state.release_task = None;
        debug!("Guard delay elapsed, local events re-enabled");
    }
}

/// Release armed on entering `ApplyingRemote`
///
/// If the apply future is dropped before it settles (a caller timeout, an
/// aborted subscription task), dropping this still schedules the release.
struct PendingRelease {
    state: Arc<Mutex<EngineState>>,
    generation: u64,
    guard_delay: Duration,
    armed: bool,
}

impl PendingRelease {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingRelease {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        warn!(
            generation = self.generation,
            "Remote command abandoned before settling, scheduling release"
        );
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(release_after(
                Arc::clone(&self.state),
                self.generation,
                self.guard_delay,
            ));
        }
    }
}

fn sanitize_position(position_seconds: f64) -> f64 {
    if position_seconds.is_finite() {
        position_seconds.max(0.0)
    } else {
        0.0
    }
}

#[async_trait]
impl RoomEventHandler for ReconciliationEngine {
    async fn handle_room_event(&self, event: BusEvent) -> Result<(), RoomEventError> {
        let outcome = self.on_remote_event(event).await;
        debug!(outcome = ?outcome, "Remote event handled");
        Ok(())
    }

    async fn on_room_left(&self, room_id: &RoomId) {
        debug!(room_id = %room_id, "Room left, resetting engine");
        self.reset().await;
    }

    fn handler_name(&self) -> &'static str {
        "ReconciliationEngine"
    }
}
