//! Two-dimensional directional axis

use serde::{Deserialize, Serialize};

use crate::keys::{CanonicalKey, KeySet};

/// Directional intent, each component in -1.0..=1.0.
///
/// Positive x points right, positive y points up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub x: f32,
    pub y: f32,
}

impl Axis {
    /// Neutral axis
    pub const ZERO: Axis = Axis { x: 0.0, y: 0.0 };

    /// Create an axis, clamping both components into range (NaN becomes 0)
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Quantized axis from the directional keys of a key set.
    ///
    /// Diagonals win over single directions, and vertical directions are
    /// checked before horizontal ones, so opposing keys never cancel out:
    /// up+down+left resolves to the up-left diagonal.
    pub fn from_directions(keys: KeySet) -> Self {
        use CanonicalKey::{Down, Left, Right, Up};

        const PRIORITY: [(&[CanonicalKey], (f32, f32)); 8] = [
            (&[Up, Left], (-1.0, 1.0)),
            (&[Up, Right], (1.0, 1.0)),
            (&[Down, Left], (-1.0, -1.0)),
            (&[Down, Right], (1.0, -1.0)),
            (&[Up], (0.0, 1.0)),
            (&[Down], (0.0, -1.0)),
            (&[Left], (-1.0, 0.0)),
            (&[Right], (1.0, 0.0)),
        ];

        PRIORITY
            .iter()
            .find(|(combo, _)| combo.iter().all(|key| keys.contains(*key)))
            .map(|(_, (x, y))| Axis { x: *x, y: *y })
            .unwrap_or(Axis::ZERO)
    }

    /// Directional keys implied by this axis.
    ///
    /// A component whose magnitude is not strictly above `threshold` yields
    /// neither of its two keys.
    pub fn directions(self, threshold: f32) -> KeySet {
        let mut keys = KeySet::EMPTY;
        if self.x < -threshold {
            keys.insert(CanonicalKey::Left);
        } else if self.x > threshold {
            keys.insert(CanonicalKey::Right);
        }
        if self.y < -threshold {
            keys.insert(CanonicalKey::Down);
        } else if self.y > threshold {
            keys.insert(CanonicalKey::Up);
        }
        keys
    }

    pub fn is_neutral(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalKey::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(Axis::new(1.7, -3.0), Axis { x: 1.0, y: -1.0 });
        assert_eq!(Axis::new(f32::NAN, 0.25), Axis { x: 0.0, y: 0.25 });
    }

    #[test]
    fn test_diagonals() {
        assert_eq!(Axis::from_directions(KeySet::from([Up, Left])), Axis::new(-1.0, 1.0));
        assert_eq!(Axis::from_directions(KeySet::from([Up, Right])), Axis::new(1.0, 1.0));
        assert_eq!(Axis::from_directions(KeySet::from([Down, Left])), Axis::new(-1.0, -1.0));
        assert_eq!(Axis::from_directions(KeySet::from([Down, Right])), Axis::new(1.0, -1.0));
    }

    #[test]
    fn test_single_directions() {
        assert_eq!(Axis::from_directions(KeySet::from([Up])), Axis::new(0.0, 1.0));
        assert_eq!(Axis::from_directions(KeySet::from([Down])), Axis::new(0.0, -1.0));
        assert_eq!(Axis::from_directions(KeySet::from([Left])), Axis::new(-1.0, 0.0));
        assert_eq!(Axis::from_directions(KeySet::from([Right])), Axis::new(1.0, 0.0));
    }

    #[test]
    fn test_no_direction_is_neutral() {
        assert_eq!(Axis::from_directions(KeySet::EMPTY), Axis::ZERO);
        assert_eq!(Axis::from_directions(KeySet::from([ButtonA, ButtonB])), Axis::ZERO);
    }

    #[test]
    fn test_derivation_is_pure() {
        for bits in 0..(1u16 << 12) {
            let keys = KeySet::from_bits(bits);
            assert_eq!(Axis::from_directions(keys), Axis::from_directions(keys));
        }
    }

    #[test]
    fn test_directions_threshold() {
        assert_eq!(Axis::new(0.6, 0.0).directions(0.5), KeySet::from([Right]));
        assert_eq!(Axis::new(-0.6, 0.9).directions(0.5), KeySet::from([Left, Up]));
        assert_eq!(Axis::new(0.5, -0.5).directions(0.5), KeySet::EMPTY);
        assert_eq!(Axis::ZERO.directions(0.5), KeySet::EMPTY);
    }
}
