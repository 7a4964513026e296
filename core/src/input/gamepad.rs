//! Fixed gamepad button table
//!
//! Gamepad buttons are already semantically labeled by the device, so the
//! translation is the same for every player.

use playerseat_shared::CanonicalKey;

/// Physical gamepad button, named by position (Xbox layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
    LeftTrigger,
    RightTrigger,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Select,
    Mode,
    LeftThumb,
    RightThumb,
}

impl GamepadButton {
    /// Canonical key for this button. Menu and stick-click buttons have none.
    pub fn canonical(self) -> Option<CanonicalKey> {
        // Face buttons (South=A, East=B, West=X, North=Y in Xbox layout)
        let key = match self {
            GamepadButton::South => CanonicalKey::ButtonA,
            GamepadButton::East => CanonicalKey::ButtonB,
            GamepadButton::West => CanonicalKey::ButtonX,
            GamepadButton::North => CanonicalKey::ButtonY,

            GamepadButton::LeftShoulder => CanonicalKey::LeftShoulder,
            GamepadButton::RightShoulder => CanonicalKey::RightShoulder,
            GamepadButton::LeftTrigger => CanonicalKey::LeftTrigger,
            GamepadButton::RightTrigger => CanonicalKey::RightTrigger,

            GamepadButton::DPadUp => CanonicalKey::Up,
            GamepadButton::DPadDown => CanonicalKey::Down,
            GamepadButton::DPadLeft => CanonicalKey::Left,
            GamepadButton::DPadRight => CanonicalKey::Right,

            GamepadButton::Start
            | GamepadButton::Select
            | GamepadButton::Mode
            | GamepadButton::LeftThumb
            | GamepadButton::RightThumb => return None,
        };
        Some(key)
    }
}
