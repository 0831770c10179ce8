use serde::Serialize;
use strum_macros::Display;

use crate::event::EventId;

/// Whether local player notifications are currently forwarded to the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplyState {
    Idle,
    ApplyingRemote,
}

/// What the outbound path did with a local player notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "event_id")]
pub enum LocalOutcome {
    Published(EventId),
    NotInRoom,
    ApplyingRemote,
    Throttled,
    PublishFailed,
}

/// What the inbound path did with a delivered bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteOutcome {
    Applied,
    /// Applied, but the player rejected at least one command
    PlaybackFailed,
    SelfEcho,
    Duplicate,
    StaleRoom,
    Invalid,
}
