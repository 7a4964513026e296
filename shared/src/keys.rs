//! Canonical key vocabulary
//!
//! Every input source (gamepad buttons, stick directions, remapped keyboard
//! keys) is reduced to one of these twelve symbols.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of canonical keys
pub const KEY_COUNT: usize = 12;

/// Semantic button or direction shared by all input sources.
///
/// The discriminant is the bit index used by [`KeySet`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKey {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    ButtonA = 4,
    ButtonB = 5,
    ButtonX = 6,
    ButtonY = 7,
    LeftShoulder = 8,
    RightShoulder = 9,
    LeftTrigger = 10,
    RightTrigger = 11,
}

impl CanonicalKey {
    /// All keys in bit order
    pub const ALL: [CanonicalKey; KEY_COUNT] = [
        CanonicalKey::Up,
        CanonicalKey::Down,
        CanonicalKey::Left,
        CanonicalKey::Right,
        CanonicalKey::ButtonA,
        CanonicalKey::ButtonB,
        CanonicalKey::ButtonX,
        CanonicalKey::ButtonY,
        CanonicalKey::LeftShoulder,
        CanonicalKey::RightShoulder,
        CanonicalKey::LeftTrigger,
        CanonicalKey::RightTrigger,
    ];

    /// The four directional keys
    pub const DIRECTIONS: [CanonicalKey; 4] = [
        CanonicalKey::Up,
        CanonicalKey::Down,
        CanonicalKey::Left,
        CanonicalKey::Right,
    ];

    /// Get the bitmask for this key
    #[inline]
    pub fn mask(self) -> u16 {
        1 << (self as u8)
    }

    /// True for up/down/left/right
    #[inline]
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            CanonicalKey::Up | CanonicalKey::Down | CanonicalKey::Left | CanonicalKey::Right
        )
    }

    /// Stable snake_case name, matching the serde representation
    pub fn name(self) -> &'static str {
        match self {
            CanonicalKey::Up => "up",
            CanonicalKey::Down => "down",
            CanonicalKey::Left => "left",
            CanonicalKey::Right => "right",
            CanonicalKey::ButtonA => "button_a",
            CanonicalKey::ButtonB => "button_b",
            CanonicalKey::ButtonX => "button_x",
            CanonicalKey::ButtonY => "button_y",
            CanonicalKey::LeftShoulder => "left_shoulder",
            CanonicalKey::RightShoulder => "right_shoulder",
            CanonicalKey::LeftTrigger => "left_trigger",
            CanonicalKey::RightTrigger => "right_trigger",
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown key name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown canonical key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for CanonicalKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Set of pressed canonical keys, stored as a bitmask.
///
/// Bit layout: UP(0), DOWN(1), LEFT(2), RIGHT(3), A(4), B(5), X(6), Y(7),
///             LS(8), RS(9), LT(10), RT(11)
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u16);

impl KeySet {
    /// The empty set
    pub const EMPTY: KeySet = KeySet(0);

    const VALID_BITS: u16 = (1 << KEY_COUNT) - 1;

    /// Build a set from a raw bitmask, dropping bits outside the key range
    pub fn from_bits(bits: u16) -> Self {
        KeySet(bits & Self::VALID_BITS)
    }

    /// Raw bitmask
    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn contains(self, key: CanonicalKey) -> bool {
        (self.0 & key.mask()) != 0
    }

    /// True if every key of `other` is in this set
    #[inline]
    pub fn contains_all(self, other: KeySet) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Insert a key. Returns true if it was not already present.
    pub fn insert(&mut self, key: CanonicalKey) -> bool {
        let was_absent = !self.contains(key);
        self.0 |= key.mask();
        was_absent
    }

    /// Remove a key. Returns true if it was present.
    pub fn remove(&mut self, key: CanonicalKey) -> bool {
        let was_present = self.contains(key);
        self.0 &= !key.mask();
        was_present
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: KeySet) -> KeySet {
        KeySet(self.0 | other.0)
    }

    /// Keys of this set that are up/down/left/right
    pub fn directions(self) -> KeySet {
        self.intersection(KeySet::from_iter(CanonicalKey::DIRECTIONS))
    }

    pub fn intersection(self, other: KeySet) -> KeySet {
        KeySet(self.0 & other.0)
    }

    /// Iterate over the keys in bit order
    pub fn iter(self) -> impl Iterator<Item = CanonicalKey> {
        CanonicalKey::ALL
            .into_iter()
            .filter(move |key| self.contains(*key))
    }
}

impl FromIterator<CanonicalKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = CanonicalKey>>(iter: I) -> Self {
        let mut set = KeySet::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<const N: usize> From<[CanonicalKey; N]> for KeySet {
    fn from(keys: [CanonicalKey; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for KeySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for KeySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keys = Vec::<CanonicalKey>::deserialize(deserializer)?;
        Ok(keys.into_iter().collect())
    }
}
