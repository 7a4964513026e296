//! Connection tri-state used to drive "connect a controller" prompts

use serde::{Deserialize, Serialize};

/// How satisfied the current device population is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No device is bound to any slot
    NoControllers,
    /// Exactly one device is bound while more than one slot is configured
    OneController,
    /// Enough devices are bound
    AllGood,
}

impl ConnectionState {
    /// Derive the state from the number of bound devices and configured slots
    pub fn from_counts(bound: usize, slot_count: usize) -> Self {
        match bound {
            0 => ConnectionState::NoControllers,
            1 if slot_count > 1 => ConnectionState::OneController,
            _ => ConnectionState::AllGood,
        }
    }

    /// Human-readable prompt, empty when nothing needs to be done
    pub fn message(self) -> &'static str {
        match self {
            ConnectionState::NoControllers => "No Controllers Connected",
            ConnectionState::OneController => {
                "One controller connected, Please connect another one"
            }
            ConnectionState::AllGood => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts() {
        assert_eq!(ConnectionState::from_counts(0, 2), ConnectionState::NoControllers);
        assert_eq!(ConnectionState::from_counts(1, 2), ConnectionState::OneController);
        assert_eq!(ConnectionState::from_counts(2, 2), ConnectionState::AllGood);
        assert_eq!(ConnectionState::from_counts(1, 1), ConnectionState::AllGood);
        assert_eq!(ConnectionState::from_counts(3, 4), ConnectionState::AllGood);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ConnectionState::NoControllers.message(), "No Controllers Connected");
        assert_eq!(
            ConnectionState::OneController.message(),
            "One controller connected, Please connect another one"
        );
        assert!(ConnectionState::AllGood.message().is_empty());
    }
}
