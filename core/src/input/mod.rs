//! Raw symbol tables for keyboard and gamepad

mod gamepad;
mod key_mapping;
pub mod keyboard;
pub(crate) mod keycode_serde;

pub use gamepad::GamepadButton;
pub use key_mapping::KeyMapping;
pub use keycode_serde::{keycode_name, parse_keycode};

use playerseat_shared::PlayerSlot;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Keyboard mappings for all 4 player slots.
/// Each player can have their own keyboard mapping or be disabled (None).
///
/// A missing `[keyboards]` table means the defaults (players 1 and 2). Once
/// the table is present, only the players it lists have a keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardsConfig {
    /// Player 1 keyboard mapping (arrows by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p1: Option<KeyMapping>,
    /// Player 2 keyboard mapping (WASD by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2: Option<KeyMapping>,
    /// Player 3 keyboard mapping (disabled by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p3: Option<KeyMapping>,
    /// Player 4 keyboard mapping (disabled by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p4: Option<KeyMapping>,
}

impl Default for KeyboardsConfig {
    fn default() -> Self {
        Self {
            p1: Some(KeyMapping::player_one()),
            p2: Some(KeyMapping::player_two()),
            p3: None,
            p4: None,
        }
    }
}

impl KeyboardsConfig {
    /// No keyboard players at all
    pub fn disabled() -> Self {
        Self {
            p1: None,
            p2: None,
            p3: None,
            p4: None,
        }
    }

    /// Get the keyboard mapping for a player
    pub fn get(&self, slot: PlayerSlot) -> Option<&KeyMapping> {
        self.entry(slot).as_ref()
    }

    /// Get a mutable reference to the keyboard mapping for a player
    pub fn get_mut(&mut self, slot: PlayerSlot) -> Option<&mut KeyMapping> {
        self.entry_mut(slot).as_mut()
    }

    /// Set or clear the keyboard mapping for a player
    pub fn set(&mut self, slot: PlayerSlot, mapping: Option<KeyMapping>) {
        *self.entry_mut(slot) = mapping;
    }

    /// Check if a player has keyboard enabled
    pub fn is_enabled(&self, slot: PlayerSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Check if any player has keyboard enabled
    pub fn any_enabled(&self) -> bool {
        self.iter_enabled().next().is_some()
    }

    /// Iterate over all (slot, mapping) pairs for enabled players
    pub fn iter_enabled(&self) -> impl Iterator<Item = (PlayerSlot, &KeyMapping)> {
        [
            (PlayerSlot::ONE, &self.p1),
            (PlayerSlot::TWO, &self.p2),
            (PlayerSlot::THREE, &self.p3),
            (PlayerSlot::FOUR, &self.p4),
        ]
        .into_iter()
        .filter_map(|(slot, opt)| opt.as_ref().map(|m| (slot, m)))
    }

    /// Validate every enabled mapping
    pub fn validate(&self) -> Result<(), InputError> {
        for (slot, mapping) in self.iter_enabled() {
            mapping.validate(slot)?;
        }
        Ok(())
    }

    fn entry(&self, slot: PlayerSlot) -> &Option<KeyMapping> {
        match slot.number() {
            1 => &self.p1,
            2 => &self.p2,
            3 => &self.p3,
            _ => &self.p4,
        }
    }

    fn entry_mut(&mut self, slot: PlayerSlot) -> &mut Option<KeyMapping> {
        match slot.number() {
            1 => &mut self.p1,
            2 => &mut self.p2,
            3 => &mut self.p3,
            _ => &mut self.p4,
        }
    }
}
