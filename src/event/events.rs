use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::room::RoomId;

/// Sequence number assigned by the bus on publish, increasing per room
pub type EventId = u64;

/// Identifies the peer session that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginId(Uuid);

impl OriginId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OriginId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OriginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PlaybackKind {
    Play,
    Pause,
    Seek,
    Sync,
}

/// A single playback action, captured at the moment the player reported it
///
/// `position_seconds` and `emitted_at_ms` are fixed by the emitting peer and
/// are never recomputed downstream. `emitted_at_ms` is only used as the
/// self-echo key; ordering comes from the bus-assigned [`EventId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackEvent {
    pub kind: PlaybackKind,
    pub position_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_play: Option<bool>,
    pub origin_id: OriginId,
    pub emitted_at_ms: i64,
}

impl PlaybackEvent {
    pub fn new(
        kind: PlaybackKind,
        position_seconds: f64,
        origin_id: OriginId,
        emitted_at_ms: i64,
    ) -> Self {
        Self {
            kind,
            position_seconds,
            should_play: None,
            origin_id,
            emitted_at_ms,
        }
    }

    pub fn sync(
        position_seconds: f64,
        should_play: bool,
        origin_id: OriginId,
        emitted_at_ms: i64,
    ) -> Self {
        Self {
            kind: PlaybackKind::Sync,
            position_seconds,
            should_play: Some(should_play),
            origin_id,
            emitted_at_ms,
        }
    }

    /// A position is usable when it is a finite, non-negative number of seconds
    pub fn has_valid_position(&self) -> bool {
        self.position_seconds.is_finite() && self.position_seconds >= 0.0
    }
}

/// Room-level metadata kept by the bus for liveness tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMetadata {
    pub created_at_ms: i64,
    pub last_activity_ms: i64,
}

impl RoomMetadata {
    pub fn new(now_ms: i64) -> Self {
        Self {
            created_at_ms: now_ms,
            last_activity_ms: now_ms,
        }
    }
}

/// A playback event as stored in, and delivered by, a room's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusEvent {
    pub event_id: EventId,
    pub room_id: RoomId,
    pub event: PlaybackEvent,
}

impl BusEvent {
    pub fn event_type(&self) -> &str {
        self.event.kind.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("play", PlaybackKind::Play)]
    #[case("PAUSE", PlaybackKind::Pause)]
    #[case("Seek", PlaybackKind::Seek)]
    #[case("sync", PlaybackKind::Sync)]
    fn test_kind_parses_case_insensitively(#[case] input: &str, #[case] expected: PlaybackKind) {
        assert_eq!(PlaybackKind::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_kind_display_matches_serde() {
        for kind in PlaybackKind::iter() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = PlaybackEvent::sync(12.0, true, OriginId::new(), 1_700_000_000_000);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["kind"], "sync");
        assert_eq!(json["positionSeconds"], 12.0);
        assert_eq!(json["shouldPlay"], true);
        assert_eq!(json["emittedAtMs"], 1_700_000_000_000_i64);
    }

    #[test]
    fn test_should_play_omitted_for_plain_events() {
        let event = PlaybackEvent::new(PlaybackKind::Pause, 3.0, OriginId::new(), 1);
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("shouldPlay").is_none());
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(42.5, true)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_position_validity(#[case] position: f64, #[case] valid: bool) {
        let event = PlaybackEvent::new(PlaybackKind::Seek, position, OriginId::new(), 1);
        assert_eq!(event.has_valid_position(), valid);
    }
}
