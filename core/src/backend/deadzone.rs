//! Deadzone application for analog inputs

/// Apply deadzone to analog stick input.
///
/// Each component is handled on its own. Values inside the deadzone become 0
/// and the rest is rescaled to span the full -1.0..=1.0 range.
pub fn apply_stick_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else if deadzone >= 1.0 {
        value.signum()
    } else {
        // Scale to full range after deadzone
        let sign = value.signum();
        let magnitude = (value.abs() - deadzone) / (1.0 - deadzone);
        sign * magnitude.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_deadzone_is_zero() {
        assert_eq!(apply_stick_deadzone(0.1, 0.2), 0.0);
        assert_eq!(apply_stick_deadzone(-0.1, 0.2), 0.0);
    }

    #[test]
    fn test_rescaled_outside_deadzone() {
        assert_eq!(apply_stick_deadzone(0.2, 0.2), 0.0);
        assert!((apply_stick_deadzone(0.6, 0.2) - 0.5).abs() < 1e-6);
        assert!((apply_stick_deadzone(-0.6, 0.2) + 0.5).abs() < 1e-6);
        assert_eq!(apply_stick_deadzone(1.0, 0.2), 1.0);
        assert_eq!(apply_stick_deadzone(-1.0, 0.2), -1.0);
    }

    #[test]
    fn test_zero_deadzone_is_identity() {
        assert_eq!(apply_stick_deadzone(0.3, 0.0), 0.3);
        assert_eq!(apply_stick_deadzone(-0.75, 0.0), -0.75);
    }
}
