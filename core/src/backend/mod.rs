//! Device layer adapters

mod deadzone;
#[cfg(feature = "gamepad")]
mod gilrs_backend;

pub use deadzone::apply_stick_deadzone;
#[cfg(feature = "gamepad")]
pub use gilrs_backend::{GilrsBackend, classify, device_id, map_button};
