//! Shared vocabulary types for playerseat.
//!
//! These types are the contract between input sources, the slot arbiter and
//! application code: the canonical key set, the directional axis, player
//! slots and the connection tri-state.

pub mod axis;
pub mod keys;
pub mod slot;
pub mod status;

pub use axis::Axis;
pub use keys::{CanonicalKey, KEY_COUNT, KeySet, UnknownKey};
pub use slot::{InvalidSlot, MAX_SLOTS, PlayerSlot};
pub use status::ConnectionState;
