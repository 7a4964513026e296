//! Playerseat Core - player slot arbitration and input normalization
//!
//! This crate maps heterogeneous local input devices onto a small set of
//! logical players with one canonical button vocabulary.
//!
//! # Architecture
//!
//! - [`SlotArbiter`] - Assigns connected gamepads to player slots and notifies listeners
//! - [`Normalizer`] - Per-player canonical key set and axis with change callbacks
//! - [`RawInputSource`] - What a normalizer reads from ([`KeyboardSource`], [`GamepadSource`])
//! - [`InputConfig`] - TOML configuration with per-player keyboard mappings
//! - [`backend`] - gilrs adapter producing [`DeviceEvent`]s (feature `gamepad`)

pub mod arbiter;
pub mod backend;
pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod normalizer;
pub mod observer;
pub mod source;
mod sync;
pub mod topology;

pub use arbiter::{SlotArbiter, SlotIndicator, TracingIndicator};
pub use config::InputConfig;
pub use device::{DeviceClass, DeviceEvent, DeviceId};
pub use error::InputError;
pub use input::{GamepadButton, KeyMapping, KeyboardsConfig};
pub use normalizer::{BindingState, DEFAULT_DIRECTION_THRESHOLD, Normalizer};
pub use observer::{Registration, TopologyListener};
pub use source::{
    Disposition, GamepadSource, KeyboardSource, RawEvent, RawInputSource, RawSymbol, SourceKind,
};
pub use topology::{ConnectionTopology, SlotChange, SlotChanges};

// Re-export shared vocabulary
pub use playerseat_shared::{
    Axis, CanonicalKey, ConnectionState, InvalidSlot, KEY_COUNT, KeySet, MAX_SLOTS, PlayerSlot,
};
