#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;

use watchsync::{
    player::{PlaybackError, PlayerAdapter},
    LocalOutcome, PlayerNotification, ReconciliationEngine,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Player whose commands call straight back into the engine
///
/// Models an element that fires its change events synchronously from inside
/// the command, before the command returns.
pub struct ReentrantPlayer {
    engine: RwLock<Option<Weak<ReconciliationEngine>>>,
    position_seconds: RwLock<f64>,
    paused: RwLock<bool>,
    outcomes: RwLock<Vec<LocalOutcome>>,
}

impl ReentrantPlayer {
    pub fn new() -> Self {
        Self {
            engine: RwLock::new(None),
            position_seconds: RwLock::new(0.0),
            paused: RwLock::new(true),
            outcomes: RwLock::new(Vec::new()),
        }
    }

    pub async fn bind(&self, engine: &Arc<ReconciliationEngine>) {
        *self.engine.write().await = Some(Arc::downgrade(engine));
    }

    /// What the engine answered to each re-entrant notification
    pub async fn outcomes(&self) -> Vec<LocalOutcome> {
        self.outcomes.read().await.clone()
    }

    async fn fire(&self, notification: PlayerNotification) {
        let engine = self.engine.read().await.as_ref().and_then(Weak::upgrade);
        if let Some(engine) = engine {
            let outcome = engine.on_local_player_event(notification).await;
            self.outcomes.write().await.push(outcome);
        }
    }
}

#[async_trait]
impl PlayerAdapter for ReentrantPlayer {
    async fn position(&self) -> f64 {
        *self.position_seconds.read().await
    }

    async fn duration(&self) -> Option<f64> {
        None
    }

    async fn is_paused(&self) -> bool {
        *self.paused.read().await
    }

    async fn seek(&self, position_seconds: f64) -> Result<(), PlaybackError> {
        *self.position_seconds.write().await = position_seconds;
        self.fire(PlayerNotification::Seeked { position_seconds }).await;
        Ok(())
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        *self.paused.write().await = false;
        let position_seconds = self.position().await;
        self.fire(PlayerNotification::Played { position_seconds }).await;
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        *self.paused.write().await = true;
        let position_seconds = self.position().await;
        self.fire(PlayerNotification::Paused { position_seconds }).await;
        Ok(())
    }
}

/// Player whose `play()` never settles; every other command succeeds
pub struct HangingPlayer;

#[async_trait]
impl PlayerAdapter for HangingPlayer {
    async fn position(&self) -> f64 {
        0.0
    }

    async fn duration(&self) -> Option<f64> {
        None
    }

    async fn is_paused(&self) -> bool {
        true
    }

    async fn seek(&self, _position_seconds: f64) -> Result<(), PlaybackError> {
        Ok(())
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        std::future::pending().await
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        Ok(())
    }
}
