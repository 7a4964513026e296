//! Errors for the fallible edges of the input stack
//!
//! Arbitration and normalization never fail; these cover configuration
//! loading and device backend setup.

use std::path::PathBuf;

use playerseat_shared::PlayerSlot;
use winit::keyboard::KeyCode;

/// Errors raised while loading configuration or starting a device backend
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Config file could not be read or written
    #[error("config I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::InputConfig`]
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Two canonical keys of one player are bound to the same key code
    #[error("player {slot}: key {key} is bound to both {first} and {second}")]
    DuplicateBinding {
        slot: PlayerSlot,
        key: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// A binding uses a key with no config name
    #[error("player {slot}: {binding} is bound to {key:?}, which has no config name")]
    UnnamedKey {
        slot: PlayerSlot,
        key: KeyCode,
        binding: &'static str,
    },

    /// Slot count outside 1-4
    #[error("slot count {0} out of range (must be 1-4)")]
    InvalidSlotCount(usize),

    /// Direction threshold or deadzone outside 0.0-1.0
    #[error("{name} {value} out of range (must be 0.0-1.0)")]
    InvalidThreshold { name: &'static str, value: f32 },

    /// Gamepad backend could not be initialized
    #[error("gamepad backend unavailable: {0}")]
    Backend(String),
}
