//! gilrs gamepad backend
//!
//! Turns gilrs events into [`DeviceEvent`]s for the arbiter and normalizers.

use gilrs::{Axis, Button, EventType, Gamepad, GamepadId, Gilrs};
use hashbrown::HashMap;

use super::deadzone::apply_stick_deadzone;
use crate::config::InputConfig;
use crate::device::{DeviceClass, DeviceEvent, DeviceId};
use crate::error::InputError;
use crate::input::GamepadButton;
use crate::source::{RawEvent, RawSymbol};

/// Stable device identity for a gilrs gamepad
pub fn device_id(id: GamepadId) -> DeviceId {
    DeviceId(usize::from(id) as u64)
}

/// Full-feature pads expose a left stick and all four face buttons
pub fn classify(gamepad: &Gamepad<'_>) -> DeviceClass {
    let face_buttons = [Button::South, Button::East, Button::West, Button::North]
        .into_iter()
        .all(|button| gamepad.button_code(button).is_some());
    let stick = gamepad.axis_code(Axis::LeftStickX).is_some()
        && gamepad.axis_code(Axis::LeftStickY).is_some();

    if face_buttons && stick {
        DeviceClass::Full
    } else {
        DeviceClass::Minimal
    }
}

/// Map a gilrs button onto the fixed gamepad table
pub fn map_button(button: Button) -> Option<GamepadButton> {
    let mapped = match button {
        // Face buttons (South=A, East=B, West=X, North=Y in Xbox layout)
        Button::South => GamepadButton::South,
        Button::East => GamepadButton::East,
        Button::West => GamepadButton::West,
        Button::North => GamepadButton::North,

        // gilrs names the bumpers LeftTrigger/RightTrigger
        Button::LeftTrigger => GamepadButton::LeftShoulder,
        Button::RightTrigger => GamepadButton::RightShoulder,
        Button::LeftTrigger2 => GamepadButton::LeftTrigger,
        Button::RightTrigger2 => GamepadButton::RightTrigger,

        Button::DPadUp => GamepadButton::DPadUp,
        Button::DPadDown => GamepadButton::DPadDown,
        Button::DPadLeft => GamepadButton::DPadLeft,
        Button::DPadRight => GamepadButton::DPadRight,

        Button::Start => GamepadButton::Start,
        Button::Select => GamepadButton::Select,
        Button::Mode => GamepadButton::Mode,
        Button::LeftThumb => GamepadButton::LeftThumb,
        Button::RightThumb => GamepadButton::RightThumb,
        _ => return None,
    };
    Some(mapped)
}

/// Gamepad event source backed by gilrs
pub struct GilrsBackend {
    gilrs: Gilrs,
    stick_deadzone: f32,
    /// Last left stick value reported per pad, deadzone applied
    sticks: HashMap<GamepadId, (f32, f32)>,
}

impl GilrsBackend {
    pub fn new(stick_deadzone: f32) -> Result<Self, InputError> {
        let gilrs = Gilrs::new().map_err(|e| {
            tracing::warn!("Failed to initialize gamepad support: {}", e);
            InputError::Backend(e.to_string())
        })?;
        tracing::info!(stick_deadzone, "Gamepad backend initialized");
        Ok(Self {
            gilrs,
            stick_deadzone: stick_deadzone.clamp(0.0, 1.0),
            sticks: HashMap::new(),
        })
    }

    pub fn from_config(config: &InputConfig) -> Result<Self, InputError> {
        Self::new(config.stick_deadzone)
    }

    /// `Connected` events for pads already present, in platform order
    pub fn scan(&mut self) -> Vec<DeviceEvent> {
        self.gilrs
            .gamepads()
            .map(|(id, gamepad)| {
                let class = classify(&gamepad);
                tracing::info!(device = %device_id(id), name = gamepad.name(), ?class, "Found gamepad");
                DeviceEvent::Connected {
                    device: device_id(id),
                    class,
                }
            })
            .collect()
    }

    /// Drain pending gilrs events
    pub fn poll(&mut self) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.gilrs.next_event() {
            let id = event.id;
            let device = device_id(id);
            match event.event {
                EventType::Connected => {
                    let gamepad = self.gilrs.gamepad(id);
                    let class = classify(&gamepad);
                    tracing::info!(%device, name = gamepad.name(), ?class, "Gamepad connected");
                    events.push(DeviceEvent::Connected { device, class });
                }
                EventType::Disconnected => {
                    self.sticks.remove(&id);
                    events.push(DeviceEvent::Disconnected { device });
                }
                EventType::ButtonPressed(button, _) => {
                    events.extend(button_event(device, button, true));
                }
                EventType::ButtonReleased(button, _) => {
                    events.extend(button_event(device, button, false));
                }
                EventType::AxisChanged(Axis::LeftStickX | Axis::LeftStickY, _, _) => {
                    events.extend(self.stick_event(id));
                }
                _ => {}
            }
        }
        events
    }

    /// Left stick event if the deadzoned value moved
    fn stick_event(&mut self, id: GamepadId) -> Option<DeviceEvent> {
        let gamepad = self.gilrs.gamepad(id);
        // gilrs reports up as positive y, same as Axis
        let x = apply_stick_deadzone(gamepad.value(Axis::LeftStickX), self.stick_deadzone);
        let y = apply_stick_deadzone(gamepad.value(Axis::LeftStickY), self.stick_deadzone);

        let last = self.sticks.insert(id, (x, y));
        if last == Some((x, y)) {
            return None;
        }
        Some(DeviceEvent::Raw(RawEvent::Axis {
            device: device_id(id),
            x,
            y,
        }))
    }
}

fn button_event(device: DeviceId, button: Button, pressed: bool) -> Option<DeviceEvent> {
    let Some(button) = map_button(button) else {
        tracing::trace!(%device, ?button, "Unknown gamepad button");
        return None;
    };
    Some(DeviceEvent::Raw(RawEvent::Button {
        device,
        symbol: RawSymbol::Button(button),
        pressed,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use playerseat_shared::CanonicalKey;

    #[test]
    fn test_shoulders_and_triggers() {
        assert_eq!(
            map_button(Button::LeftTrigger).and_then(GamepadButton::canonical),
            Some(CanonicalKey::LeftShoulder)
        );
        assert_eq!(
            map_button(Button::RightTrigger2).and_then(GamepadButton::canonical),
            Some(CanonicalKey::RightTrigger)
        );
    }

    #[test]
    fn test_unknown_buttons_dropped() {
        assert_eq!(map_button(Button::C), None);
        assert_eq!(map_button(Button::Unknown), None);
        assert_eq!(button_event(DeviceId(0), Button::Z, true), None);
    }

    #[test]
    fn test_button_event_shape() {
        assert_eq!(
            button_event(DeviceId(4), Button::South, false),
            Some(DeviceEvent::Raw(RawEvent::Button {
                device: DeviceId(4),
                symbol: RawSymbol::Button(GamepadButton::South),
                pressed: false,
            }))
        );
    }
}
