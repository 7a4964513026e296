//! Raw input sources
//!
//! A [`RawInputSource`] tells a normalizer which device feeds a slot, how to
//! translate that device's symbols, and how satisfied the device population
//! is. The normalizer is written once against this trait.

use std::sync::Arc;

use playerseat_shared::{CanonicalKey, ConnectionState, PlayerSlot};
use winit::keyboard::KeyCode;

use crate::arbiter::SlotArbiter;
use crate::config::InputConfig;
use crate::device::DeviceId;
use crate::input::{GamepadButton, KeyboardsConfig};
use crate::observer::{Registration, TopologyListener};

/// Kind of physical source behind a normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Keyboard,
    Gamepad,
}

/// Device-specific symbol before translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawSymbol {
    Key(KeyCode),
    Button(GamepadButton),
}

/// Raw input from one device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    /// Button or key edge
    Button {
        device: DeviceId,
        symbol: RawSymbol,
        pressed: bool,
    },
    /// Continuous directional input
    Axis { device: DeviceId, x: f32, y: f32 },
}

impl RawEvent {
    pub fn device(&self) -> DeviceId {
        match *self {
            RawEvent::Button { device, .. } | RawEvent::Axis { device, .. } => device,
        }
    }
}

/// Whether a normalizer used a raw event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Event was mapped and applied; the host should swallow it
    Consumed,
    /// Event belongs to someone else; the host should handle it normally
    PassThrough,
}

impl Disposition {
    pub fn is_consumed(self) -> bool {
        self == Disposition::Consumed
    }
}

/// Capability a normalizer needs from its input source
pub trait RawInputSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Device currently feeding `slot`
    fn resolve(&self, slot: PlayerSlot) -> Option<DeviceId>;

    /// Canonical key for a raw symbol as seen by the player in `slot`
    fn translate(&self, slot: PlayerSlot, symbol: RawSymbol) -> Option<CanonicalKey>;

    /// True when the device has a continuous axis; otherwise the axis is
    /// derived from the directional keys
    fn reports_axis(&self) -> bool;

    fn connection_state(&self) -> ConnectionState;

    /// Register for topology changes, if the source has any
    fn subscribe(&self, listener: Arc<dyn TopologyListener>) -> Option<Registration>;
}

/// Keyboard shared by up to four players, each with their own key mapping
#[derive(Debug, Clone, Default)]
pub struct KeyboardSource {
    keyboards: KeyboardsConfig,
}

impl KeyboardSource {
    pub fn new(keyboards: KeyboardsConfig) -> Self {
        Self { keyboards }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(config.keyboards.clone())
    }

    pub fn keyboards(&self) -> &KeyboardsConfig {
        &self.keyboards
    }
}

impl RawInputSource for KeyboardSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Keyboard
    }

    fn resolve(&self, slot: PlayerSlot) -> Option<DeviceId> {
        self.keyboards
            .is_enabled(slot)
            .then_some(DeviceId::KEYBOARD)
    }

    fn translate(&self, slot: PlayerSlot, symbol: RawSymbol) -> Option<CanonicalKey> {
        match symbol {
            RawSymbol::Key(code) => self.keyboards.get(slot)?.canonical_for(code),
            RawSymbol::Button(_) => None,
        }
    }

    fn reports_axis(&self) -> bool {
        false
    }

    fn connection_state(&self) -> ConnectionState {
        if self.keyboards.any_enabled() {
            ConnectionState::AllGood
        } else {
            ConnectionState::NoControllers
        }
    }

    fn subscribe(&self, _listener: Arc<dyn TopologyListener>) -> Option<Registration> {
        None
    }
}

/// Gamepads arbitrated by a shared [`SlotArbiter`]
#[derive(Debug, Clone)]
pub struct GamepadSource {
    arbiter: Arc<SlotArbiter>,
}

impl GamepadSource {
    pub fn new(arbiter: Arc<SlotArbiter>) -> Self {
        Self { arbiter }
    }

    pub fn arbiter(&self) -> &Arc<SlotArbiter> {
        &self.arbiter
    }
}

impl RawInputSource for GamepadSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Gamepad
    }

    fn resolve(&self, slot: PlayerSlot) -> Option<DeviceId> {
        self.arbiter.resolve_device(slot)
    }

    fn translate(&self, _slot: PlayerSlot, symbol: RawSymbol) -> Option<CanonicalKey> {
        match symbol {
            RawSymbol::Button(button) => button.canonical(),
            RawSymbol::Key(_) => None,
        }
    }

    fn reports_axis(&self) -> bool {
        true
    }

    fn connection_state(&self) -> ConnectionState {
        self.arbiter.connection_state()
    }

    fn subscribe(&self, listener: Arc<dyn TopologyListener>) -> Option<Registration> {
        Some(self.arbiter.subscribe(listener))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceClass;
    use crate::input::KeyMapping;

    #[test]
    fn test_keyboard_translation_is_per_player() {
        let source = KeyboardSource::default();
        let w = RawSymbol::Key(KeyCode::KeyW);
        assert_eq!(source.translate(PlayerSlot::TWO, w), Some(CanonicalKey::Up));
        assert_eq!(source.translate(PlayerSlot::ONE, w), None);
        assert_eq!(source.translate(PlayerSlot::THREE, w), None);
        assert_eq!(
            source.translate(PlayerSlot::ONE, RawSymbol::Button(GamepadButton::South)),
            None
        );
    }

    #[test]
    fn test_keyboard_resolution_and_state() {
        let mut keyboards = KeyboardsConfig::disabled();
        let source = KeyboardSource::new(keyboards.clone());
        assert_eq!(source.resolve(PlayerSlot::ONE), None);
        assert_eq!(source.connection_state(), ConnectionState::NoControllers);

        keyboards.set(PlayerSlot::FOUR, Some(KeyMapping::player_one()));
        let source = KeyboardSource::new(keyboards);
        assert_eq!(source.resolve(PlayerSlot::FOUR), Some(DeviceId::KEYBOARD));
        assert_eq!(source.resolve(PlayerSlot::ONE), None);
        assert_eq!(source.connection_state(), ConnectionState::AllGood);
        assert!(!source.reports_axis());
    }

    #[test]
    fn test_gamepad_source_follows_arbiter() {
        let arbiter = Arc::new(SlotArbiter::new(2, true));
        let source = GamepadSource::new(arbiter.clone());
        assert_eq!(source.resolve(PlayerSlot::ONE), None);

        arbiter.on_device_connected(DeviceId(7), DeviceClass::Full);
        assert_eq!(source.resolve(PlayerSlot::ONE), Some(DeviceId(7)));
        assert_eq!(source.connection_state(), ConnectionState::OneController);
        assert_eq!(
            source.translate(PlayerSlot::ONE, RawSymbol::Button(GamepadButton::North)),
            Some(CanonicalKey::ButtonY)
        );
        assert_eq!(
            source.translate(PlayerSlot::ONE, RawSymbol::Key(KeyCode::ArrowUp)),
            None
        );
    }
}
