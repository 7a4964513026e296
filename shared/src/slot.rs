//! Logical player slots

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of player slots
pub const MAX_SLOTS: usize = 4;

/// Logical seat (1-4) that application code addresses instead of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerSlot(u8);

impl PlayerSlot {
    pub const ONE: PlayerSlot = PlayerSlot(1);
    pub const TWO: PlayerSlot = PlayerSlot(2);
    pub const THREE: PlayerSlot = PlayerSlot(3);
    pub const FOUR: PlayerSlot = PlayerSlot(4);

    /// All slots, lowest first
    pub const ALL: [PlayerSlot; MAX_SLOTS] = [Self::ONE, Self::TWO, Self::THREE, Self::FOUR];

    /// Create a slot from its 1-based number
    pub fn new(number: u8) -> Option<Self> {
        if (1..=MAX_SLOTS as u8).contains(&number) {
            Some(PlayerSlot(number))
        } else {
            None
        }
    }

    /// Create a slot from a 0-based index
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index + 1).ok().and_then(Self::new)
    }

    /// 1-based slot number
    #[inline]
    pub fn number(self) -> u8 {
        self.0
    }

    /// 0-based slot index
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The first `count` slots (capped at [`MAX_SLOTS`])
    pub fn first(count: usize) -> impl Iterator<Item = PlayerSlot> {
        Self::ALL.into_iter().take(count.min(MAX_SLOTS))
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Error for slot numbers outside 1-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid player slot {0} (must be 1-{max})", max = MAX_SLOTS)]
pub struct InvalidSlot(pub u8);

impl TryFrom<u8> for PlayerSlot {
    type Error = InvalidSlot;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PlayerSlot::new(value).ok_or(InvalidSlot(value))
    }
}

impl From<PlayerSlot> for u8 {
    fn from(slot: PlayerSlot) -> Self {
        slot.0
    }
}
