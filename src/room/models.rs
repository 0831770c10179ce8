use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::AppError;

/// Number of characters in a room code
pub const ROOM_CODE_LEN: usize = 4;

/// A user-facing room code: four ASCII letters or digits, stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Parses user input, trimming whitespace and ignoring case
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let code = input.trim();

        let valid = code.len() == ROOM_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(AppError::InvalidRoomCode(input.to_string()));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Wraps a code already drawn from the uppercase alphanumeric alphabet
    pub(super) fn from_generated(code: String) -> Self {
        debug_assert_eq!(code.len(), ROOM_CODE_LEN);
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomId> for String {
    fn from(room_id: RoomId) -> Self {
        room_id.0
    }
}
