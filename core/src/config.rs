//! Configuration management (`<config dir>/input.toml`)
//!
//! Handles loading, saving, and providing defaults for slot arbitration and
//! keyboard layouts. Settings are stored in TOML format in the
//! platform-specific config directory.

use std::path::{Path, PathBuf};

use playerseat_shared::MAX_SLOTS;
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::input::KeyboardsConfig;

const CONFIG_FILE: &str = "input.toml";

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Number of player slots (default: 4, range: 1-4)
    #[serde(default = "default_slot_count")]
    pub slot_count: usize,

    /// Let full-feature gamepads take slots from minimal ones when full (default: true)
    #[serde(default = "default_true")]
    pub prefer_full_feature: bool,

    /// Stick magnitude above which a direction counts as pressed (default: 0.5)
    #[serde(default = "default_direction_threshold")]
    pub direction_threshold: f32,

    /// Deadzone for analog sticks (default: 0.15, range: 0.0-1.0)
    #[serde(default = "default_deadzone")]
    pub stick_deadzone: f32,

    /// Keyboard mappings per player slot
    #[serde(default)]
    pub keyboards: KeyboardsConfig,
}

fn default_slot_count() -> usize {
    MAX_SLOTS
}
fn default_true() -> bool {
    true
}
fn default_direction_threshold() -> f32 {
    0.5
}
fn default_deadzone() -> f32 {
    0.15
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            slot_count: default_slot_count(),
            prefer_full_feature: default_true(),
            direction_threshold: default_direction_threshold(),
            stick_deadzone: default_deadzone(),
            keyboards: KeyboardsConfig::default(),
        }
    }
}

impl InputConfig {
    /// Check ranges and keyboard mapping injectivity
    pub fn validate(&self) -> Result<(), InputError> {
        if !(1..=MAX_SLOTS).contains(&self.slot_count) {
            return Err(InputError::InvalidSlotCount(self.slot_count));
        }
        check_unit("direction_threshold", self.direction_threshold)?;
        check_unit("stick_deadzone", self.stick_deadzone)?;
        self.keyboards.validate()
    }

    /// Read and validate a config file
    pub fn load_from(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: InputConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and write a config file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), InputError> {
        self.validate()?;
        let io_err = |source| InputError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), InputError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InputError::InvalidThreshold { name, value })
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Playerseat\config`
/// On macOS: `~/Library/Application Support/io.playerseat.Playerseat`
/// On Linux: `~/.config/playerseat`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.playerseat", "", "Playerseat")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of the default config file, if a config directory exists
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from disk.
///
/// Reads `input.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or is invalid.
pub fn load() -> InputConfig {
    let Some(path) = config_path() else {
        return InputConfig::default();
    };
    if !path.exists() {
        return InputConfig::default();
    }
    match InputConfig::load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Ignoring input config: {}", e);
            InputConfig::default()
        }
    }
}

/// Saves the configuration to the platform's configuration directory.
///
/// Does nothing when no config directory can be determined.
pub fn save(config: &InputConfig) -> Result<(), InputError> {
    match config_path() {
        Some(path) => config.save_to(&path),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playerseat_shared::PlayerSlot;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_config_default() {
        let config = InputConfig::default();
        assert_eq!(config.slot_count, 4);
        assert!(config.prefer_full_feature);
        assert!((config.direction_threshold - 0.5).abs() < f32::EPSILON);
        assert!((config.stick_deadzone - 0.15).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: InputConfig = toml::from_str("").unwrap();
        assert_eq!(config, InputConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml_str = r#"
slot_count = 2
prefer_full_feature = false

[keyboards.p3]
up = "I"
down = "K"
left = "J"
right = "L"
button_a = "Numpad1"
button_b = "Numpad2"
button_x = "Numpad4"
button_y = "Numpad5"
left_shoulder = "Numpad7"
right_shoulder = "Numpad8"
left_trigger = "Numpad0"
right_trigger = "NumpadDecimal"
"#;
        let config: InputConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.slot_count, 2);
        assert!(!config.prefer_full_feature);
        assert!((config.direction_threshold - 0.5).abs() < f32::EPSILON);
        assert!(!config.keyboards.is_enabled(PlayerSlot::ONE));
        let p3 = config.keyboards.get(PlayerSlot::THREE).unwrap();
        assert_eq!(p3.up, KeyCode::KeyI);
        assert_eq!(p3.right_trigger, KeyCode::NumpadDecimal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_slot_count() {
        for bad in [0, 5] {
            let config = InputConfig {
                slot_count: bad,
                ..InputConfig::default()
            };
            assert!(matches!(config.validate(), Err(InputError::InvalidSlotCount(n)) if n == bad));
        }
    }

    #[test]
    fn test_validate_threshold() {
        let config = InputConfig {
            direction_threshold: 1.5,
            ..InputConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InputError::InvalidThreshold { name: "direction_threshold", .. })
        ));

        let config = InputConfig {
            stick_deadzone: -0.1,
            ..InputConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InputError::InvalidThreshold { name: "stick_deadzone", .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("input.toml");

        let mut config = InputConfig {
            slot_count: 3,
            ..InputConfig::default()
        };
        config.keyboards.set(PlayerSlot::TWO, None);
        config.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("ArrowUp"));
        assert!(!text.contains("[keyboards.p2]"));

        let loaded = InputConfig::load_from(&path).unwrap();
        assert_eq!(loaded.slot_count, 3);
        assert!(loaded.keyboards.is_enabled(PlayerSlot::ONE));
        assert!(!loaded.keyboards.is_enabled(PlayerSlot::TWO));
    }

    #[test]
    fn test_function_key_binding_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");

        let mut config = InputConfig::default();
        if let Some(p1) = config.keyboards.get_mut(PlayerSlot::ONE) {
            p1.button_a = KeyCode::F1;
        }
        config.save_to(&path).unwrap();

        let loaded = InputConfig::load_from(&path).unwrap();
        assert_eq!(
            loaded.keyboards.get(PlayerSlot::ONE).map(|m| m.button_a),
            Some(KeyCode::F1)
        );
        assert_eq!(loaded.keyboards, config.keyboards);
    }

    #[test]
    fn test_save_rejects_unnamed_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");

        let mut config = InputConfig::default();
        if let Some(p1) = config.keyboards.get_mut(PlayerSlot::ONE) {
            p1.button_a = KeyCode::F24;
        }
        assert!(matches!(
            config.save_to(&path),
            Err(InputError::UnnamedKey { key: KeyCode::F24, .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InputConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn test_load_rejects_duplicate_binding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        std::fs::write(
            &path,
            r#"
[keyboards.p1]
up = "W"
down = "S"
left = "A"
right = "D"
button_a = "W"
button_b = "K"
button_x = "J"
button_y = "H"
left_shoulder = "U"
right_shoulder = "P"
left_trigger = "I"
right_trigger = "O"
"#,
        )
        .unwrap();

        let err = InputConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, InputError::DuplicateBinding { .. }));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        std::fs::write(&path, "slot_count = \"four\"").unwrap();
        assert!(matches!(
            InputConfig::load_from(&path),
            Err(InputError::Parse(_))
        ));
    }
}
