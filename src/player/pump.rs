use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use super::adapter::PlayerNotification;
use crate::sync::ReconciliationEngine;

/// Forward player notifications to the engine's outbound path
///
/// The player only ever pushes into an unbounded channel, so it never waits on
/// a publish. The pump ends when every sender is dropped.
pub fn spawn_notification_pump(
    engine: Arc<ReconciliationEngine>,
    receiver: UnboundedReceiver<PlayerNotification>,
) -> JoinHandle<()> {
    tokio::spawn(run_notification_pump(engine, receiver))
}

#[instrument(skip_all, fields(origin_id = %engine.origin_id()))]
async fn run_notification_pump(
    engine: Arc<ReconciliationEngine>,
    mut receiver: UnboundedReceiver<PlayerNotification>,
) {
    info!("Player notification pump started");

    while let Some(notification) = receiver.recv().await {
        let outcome = engine.on_local_player_event(notification).await;
        debug!(
            kind = %notification.kind(),
            outcome = ?outcome,
            "Forwarded player notification"
        );
    }

    info!("Player notification channel closed, pump stopped");
}
