use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::models::{RoomId, ROOM_CODE_LEN};

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Trait for generating room codes
pub trait RoomCodeGenerator: Send + Sync {
    fn generate(&self) -> RoomId;
}

/// Uniformly random codes over the 36-symbol alphabet
///
/// Collisions are possible and left to the bus to reject.
pub struct RandomRoomCodeGenerator;

impl RandomRoomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomRoomCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomCodeGenerator for RandomRoomCodeGenerator {
    fn generate(&self) -> RoomId {
        let mut rng = rand::rng();
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();

        RoomId::from_generated(code)
    }
}

/// Hands out a scripted sequence of codes, then repeats the last one
pub struct FixedRoomCodeGenerator {
    codes: Mutex<VecDeque<RoomId>>,
    last: RoomId,
}

impl FixedRoomCodeGenerator {
    pub fn new(first: RoomId) -> Self {
        Self {
            codes: Mutex::new(VecDeque::new()),
            last: first,
        }
    }

    pub fn sequence(codes: Vec<RoomId>) -> Self {
        let last = codes
            .last()
            .cloned()
            .unwrap_or_else(|| RandomRoomCodeGenerator::new().generate());
        Self {
            codes: Mutex::new(codes.into()),
            last,
        }
    }
}

impl RoomCodeGenerator for FixedRoomCodeGenerator {
    fn generate(&self) -> RoomId {
        match self.codes.lock() {
            Ok(mut codes) => codes.pop_front().unwrap_or_else(|| self.last.clone()),
            Err(_) => self.last.clone(),
        }
    }
}
