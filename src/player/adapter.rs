use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::PlaybackKind;

/// Errors a player can report when asked to change playback
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Playback blocked by autoplay policy")]
    AutoplayBlocked,

    #[error("No media attached")]
    NoMedia,

    #[error("Player error: {0}")]
    Other(String),
}

/// Boundary to one concrete video player
///
/// Implementations report user actions as [`PlayerNotification`]s. Commands
/// issued through this trait usually make the player emit the same
/// notifications a user action would, which is why the reconciliation engine
/// suppresses local notifications while it applies remote commands.
#[async_trait]
pub trait PlayerAdapter: Send + Sync {
    async fn position(&self) -> f64;

    /// Media length in seconds, when known
    async fn duration(&self) -> Option<f64>;

    async fn is_paused(&self) -> bool;

    async fn seek(&self, position_seconds: f64) -> Result<(), PlaybackError>;

    async fn play(&self) -> Result<(), PlaybackError>;

    async fn pause(&self) -> Result<(), PlaybackError>;

    /// Current state in one read
    async fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position_seconds: self.position().await,
            duration_seconds: self.duration().await,
            paused: self.is_paused().await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position_seconds: f64,
    pub duration_seconds: Option<f64>,
    pub paused: bool,
}

/// A settled state change reported by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerNotification {
    Played { position_seconds: f64 },
    Paused { position_seconds: f64 },
    Seeked { position_seconds: f64 },
}

impl PlayerNotification {
    /// The notification a player emits for `kind`; `Sync` has none
    pub fn from_kind(kind: PlaybackKind, position_seconds: f64) -> Option<Self> {
        match kind {
            PlaybackKind::Play => Some(PlayerNotification::Played { position_seconds }),
            PlaybackKind::Pause => Some(PlayerNotification::Paused { position_seconds }),
            PlaybackKind::Seek => Some(PlayerNotification::Seeked { position_seconds }),
            PlaybackKind::Sync => None,
        }
    }

    pub fn kind(&self) -> PlaybackKind {
        match self {
            PlayerNotification::Played { .. } => PlaybackKind::Play,
            PlayerNotification::Paused { .. } => PlaybackKind::Pause,
            PlayerNotification::Seeked { .. } => PlaybackKind::Seek,
        }
    }

    pub fn position_seconds(&self) -> f64 {
        match self {
            PlayerNotification::Played { position_seconds }
            | PlayerNotification::Paused { position_seconds }
            | PlayerNotification::Seeked { position_seconds } => *position_seconds,
        }
    }
}
