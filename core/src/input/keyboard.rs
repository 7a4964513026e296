//! winit keyboard event extraction

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Extract `(key, is_down)` from a window key event.
///
/// Auto-repeat presses and keys without a physical code yield `None`.
pub fn key_event(event: &KeyEvent) -> Option<(KeyCode, bool)> {
    key_edge(event.physical_key, event.state, event.repeat)
}

fn key_edge(physical_key: PhysicalKey, state: ElementState, repeat: bool) -> Option<(KeyCode, bool)> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };
    match state {
        ElementState::Pressed if repeat => None,
        ElementState::Pressed => Some((code, true)),
        ElementState::Released => Some((code, false)),
    }
}
