use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::adapter::{PlaybackError, PlayerAdapter, PlayerNotification};

/// A command the player received through [`PlayerAdapter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Seek(f64),
    Play,
    Pause,
}

#[derive(Debug)]
struct PlayerState {
    position_seconds: f64,
    duration_seconds: Option<f64>,
    paused: bool,
}

/// In-process player that behaves like a media element
///
/// Commands change state and, like a real element, emit the matching
/// notification: `Seeked` after every seek, `Played`/`Paused` only when the
/// paused flag actually flips. Every command is recorded, including rejected
/// play attempts. The `user_*` helpers model a viewer acting on the player
/// directly; they emit notifications but are not recorded as commands.
pub struct SimulatedPlayer {
    state: RwLock<PlayerState>,
    commands: RwLock<Vec<PlayerCommand>>,
    notifications: Option<mpsc::UnboundedSender<PlayerNotification>>,
    autoplay_blocked: AtomicBool,
}

impl SimulatedPlayer {
    /// A paused player at position zero that emits no notifications
    pub fn new() -> Self {
        Self {
            state: RwLock::new(PlayerState {
                position_seconds: 0.0,
                duration_seconds: None,
                paused: true,
            }),
            commands: RwLock::new(Vec::new()),
            notifications: None,
            autoplay_blocked: AtomicBool::new(false),
        }
    }

    /// A player plus the receiving end of its notifications
    pub fn with_notifications() -> (Self, mpsc::UnboundedReceiver<PlayerNotification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let player = Self {
            notifications: Some(sender),
            ..Self::new()
        };
        (player, receiver)
    }

    pub async fn set_duration(&self, duration_seconds: f64) {
        self.state.write().await.duration_seconds = Some(duration_seconds);
    }

    /// Make subsequent `play()` calls reject as a browser autoplay policy would
    pub fn block_autoplay(&self, blocked: bool) {
        self.autoplay_blocked.store(blocked, Ordering::SeqCst);
    }

    pub async fn commands(&self) -> Vec<PlayerCommand> {
        self.commands.read().await.clone()
    }

    pub async fn clear_commands(&self) {
        self.commands.write().await.clear();
    }

    pub async fn user_play(&self) {
        let position_seconds = {
            let mut state = self.state.write().await;
            state.paused = false;
            state.position_seconds
        };
        self.notify(PlayerNotification::Played { position_seconds });
    }

    pub async fn user_pause(&self) {
        let position_seconds = {
            let mut state = self.state.write().await;
            state.paused = true;
            state.position_seconds
        };
        self.notify(PlayerNotification::Paused { position_seconds });
    }

    pub async fn user_seek(&self, position_seconds: f64) {
        self.state.write().await.position_seconds = position_seconds;
        self.notify(PlayerNotification::Seeked { position_seconds });
    }

    async fn record(&self, command: PlayerCommand) {
        debug!(command = ?command, "Simulated player received command");
        self.commands.write().await.push(command);
    }

    fn notify(&self, notification: PlayerNotification) {
        if let Some(sender) = &self.notifications {
            // Receiver gone means nobody listens any more
            let _ = sender.send(notification);
        }
    }
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerAdapter for SimulatedPlayer {
    async fn position(&self) -> f64 {
        self.state.read().await.position_seconds
    }

    async fn duration(&self) -> Option<f64> {
        self.state.read().await.duration_seconds
    }

    async fn is_paused(&self) -> bool {
        self.state.read().await.paused
    }

    async fn seek(&self, position_seconds: f64) -> Result<(), PlaybackError> {
        self.record(PlayerCommand::Seek(position_seconds)).await;
        self.state.write().await.position_seconds = position_seconds;
        self.notify(PlayerNotification::Seeked { position_seconds });
        Ok(())
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        self.record(PlayerCommand::Play).await;
        if self.autoplay_blocked.load(Ordering::SeqCst) {
            return Err(PlaybackError::AutoplayBlocked);
        }

        let (was_paused, position_seconds) = {
            let mut state = self.state.write().await;
            let was_paused = state.paused;
            state.paused = false;
            (was_paused, state.position_seconds)
        };
        if was_paused {
            self.notify(PlayerNotification::Played { position_seconds });
        }
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.record(PlayerCommand::Pause).await;

        let (was_playing, position_seconds) = {
            let mut state = self.state.write().await;
            let was_playing = !state.paused;
            state.paused = true;
            (was_playing, state.position_seconds)
        };
        if was_playing {
            self.notify(PlayerNotification::Paused { position_seconds });
        }
        Ok(())
    }
}
