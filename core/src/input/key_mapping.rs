//! Keyboard to canonical key mapping for one player

use playerseat_shared::{CanonicalKey, PlayerSlot};
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use super::keycode_serde::{deserialize_keycode, keycode_name, serialize_keycode};
use crate::error::InputError;

/// Per-player keyboard layout with string-based serialization.
///
/// Every canonical key is bound to exactly one key code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMapping {
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub up: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub down: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub left: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub right: KeyCode,

    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub button_a: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub button_b: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub button_x: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub button_y: KeyCode,

    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub left_shoulder: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub right_shoulder: KeyCode,

    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub left_trigger: KeyCode,
    #[serde(serialize_with = "serialize_keycode", deserialize_with = "deserialize_keycode")]
    pub right_trigger: KeyCode,
}

impl KeyMapping {
    /// Player one layout: arrows, H/J/K/L face buttons, U/P shoulders, I/O triggers
    pub fn player_one() -> Self {
        Self {
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,

            button_a: KeyCode::KeyL,
            button_b: KeyCode::KeyK,
            button_x: KeyCode::KeyJ,
            button_y: KeyCode::KeyH,

            left_shoulder: KeyCode::KeyU,
            right_shoulder: KeyCode::KeyP,

            left_trigger: KeyCode::KeyI,
            right_trigger: KeyCode::KeyO,
        }
    }

    /// Player two layout: WASD, Z/X/C/V face buttons, R/T shoulders, F/G triggers
    pub fn player_two() -> Self {
        Self {
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,

            button_a: KeyCode::KeyZ,
            button_b: KeyCode::KeyX,
            button_x: KeyCode::KeyC,
            button_y: KeyCode::KeyV,

            left_shoulder: KeyCode::KeyR,
            right_shoulder: KeyCode::KeyT,

            left_trigger: KeyCode::KeyF,
            right_trigger: KeyCode::KeyG,
        }
    }

    /// Key code bound to a canonical key
    pub fn key_for(&self, key: CanonicalKey) -> KeyCode {
        match key {
            CanonicalKey::Up => self.up,
            CanonicalKey::Down => self.down,
            CanonicalKey::Left => self.left,
            CanonicalKey::Right => self.right,
            CanonicalKey::ButtonA => self.button_a,
            CanonicalKey::ButtonB => self.button_b,
            CanonicalKey::ButtonX => self.button_x,
            CanonicalKey::ButtonY => self.button_y,
            CanonicalKey::LeftShoulder => self.left_shoulder,
            CanonicalKey::RightShoulder => self.right_shoulder,
            CanonicalKey::LeftTrigger => self.left_trigger,
            CanonicalKey::RightTrigger => self.right_trigger,
        }
    }

    /// Canonical key a key code is bound to, if any
    pub fn canonical_for(&self, code: KeyCode) -> Option<CanonicalKey> {
        CanonicalKey::ALL
            .into_iter()
            .find(|key| self.key_for(*key) == code)
    }

    /// (canonical key, key code) pairs in canonical order
    pub fn bindings(&self) -> impl Iterator<Item = (CanonicalKey, KeyCode)> + '_ {
        CanonicalKey::ALL
            .into_iter()
            .map(move |key| (key, self.key_for(key)))
    }

    /// Returns all keys bound in this mapping
    pub fn all_keys(&self) -> Vec<KeyCode> {
        self.bindings().map(|(_, code)| code).collect()
    }

    /// Reject mappings that bind one key code to two canonical keys or use
    /// a key that cannot be written back to a config file
    pub fn validate(&self, slot: PlayerSlot) -> Result<(), InputError> {
        let mut named = Vec::with_capacity(CanonicalKey::ALL.len());
        for (binding, code) in self.bindings() {
            let Some(name) = keycode_name(code) else {
                return Err(InputError::UnnamedKey {
                    slot,
                    key: code,
                    binding: binding.name(),
                });
            };
            named.push((binding, code, name));
        }

        for (i, (first, code, name)) in named.iter().enumerate() {
            if let Some((second, _, _)) = named[i + 1..].iter().find(|(_, other, _)| other == code) {
                return Err(InputError::DuplicateBinding {
                    slot,
                    key: *name,
                    first: first.name(),
                    second: second.name(),
                });
            }
        }
        Ok(())
    }
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self::player_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layouts_are_valid() {
        assert!(KeyMapping::player_one().validate(PlayerSlot::ONE).is_ok());
        assert!(KeyMapping::player_two().validate(PlayerSlot::TWO).is_ok());
    }

    #[test]
    fn test_canonical_lookup() {
        let mapping = KeyMapping::player_two();
        assert_eq!(mapping.canonical_for(KeyCode::KeyW), Some(CanonicalKey::Up));
        assert_eq!(mapping.canonical_for(KeyCode::KeyG), Some(CanonicalKey::RightTrigger));
        assert_eq!(mapping.canonical_for(KeyCode::ArrowUp), None);
    }

    #[test]
    fn test_key_for_inverts_canonical_for() {
        let mapping = KeyMapping::player_one();
        for key in CanonicalKey::ALL {
            assert_eq!(mapping.canonical_for(mapping.key_for(key)), Some(key));
        }
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let mapping = KeyMapping {
            button_b: KeyCode::KeyL,
            ..KeyMapping::player_one()
        };
        let err = mapping.validate(PlayerSlot::ONE).unwrap_err();
        match err {
            InputError::DuplicateBinding { key, first, second, .. } => {
                assert_eq!(key, "L");
                assert_eq!(first, "button_a");
                assert_eq!(second, "button_b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mapping_toml_uses_key_names() {
        let text = toml::to_string(&KeyMapping::player_one()).expect("serialize");
        assert!(text.contains("up = \"ArrowUp\""));
        assert!(text.contains("button_y = \"H\""));

        let back: KeyMapping = toml::from_str(&text).expect("deserialize");
        assert_eq!(back, KeyMapping::player_one());
    }

    #[test]
    fn test_function_key_round_trips() {
        let mapping = KeyMapping {
            button_a: KeyCode::F1,
            right_trigger: KeyCode::F12,
            ..KeyMapping::player_one()
        };
        assert!(mapping.validate(PlayerSlot::ONE).is_ok());

        let text = toml::to_string(&mapping).expect("serialize");
        assert!(text.contains("button_a = \"F1\""));
        let back: KeyMapping = toml::from_str(&text).expect("deserialize");
        assert_eq!(back, mapping);
    }

    #[test]
    fn test_unnamed_key_rejected() {
        let mapping = KeyMapping {
            button_b: KeyCode::F24,
            ..KeyMapping::player_one()
        };
        match mapping.validate(PlayerSlot::TWO) {
            Err(InputError::UnnamedKey { slot, key, binding }) => {
                assert_eq!(slot, PlayerSlot::TWO);
                assert_eq!(key, KeyCode::F24);
                assert_eq!(binding, "button_b");
            }
            other => panic!("expected unnamed key, got {other:?}"),
        }
        assert!(toml::to_string(&mapping).is_err());
    }

    #[test]
    fn test_unknown_key_name_fails() {
        let mut text = toml::to_string(&KeyMapping::player_two()).expect("serialize");
        text = text.replace("up = \"W\"", "up = \"Hyper\"");
        assert!(toml::from_str::<KeyMapping>(&text).is_err());
    }
}
