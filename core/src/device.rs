//! Physical device identity and device-layer events

use std::fmt;

use crate::source::RawEvent;

/// Opaque stable identity of a physical input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u64);

impl DeviceId {
    /// Reserved identity for the keyboard layer
    pub const KEYBOARD: DeviceId = DeviceId(u64::MAX);
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == DeviceId::KEYBOARD {
            write!(f, "keyboard")
        } else {
            write!(f, "device#{}", self.0)
        }
    }
}

/// Capability class of a gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Full button and stick surface
    Full,
    /// Reduced surface (no stick or missing face buttons)
    Minimal,
}

/// Event produced by a device layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    Connected { device: DeviceId, class: DeviceClass },
    Disconnected { device: DeviceId },
    Raw(RawEvent),
}
