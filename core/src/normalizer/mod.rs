//! Unified input normalizer
//!
//! One [`Normalizer`] per logical player. It turns raw edges and axis values
//! from whatever device its [`RawInputSource`] resolves for its slot into a
//! canonical pressed-key set and a directional axis, and notifies the
//! registered callbacks when either changes.
//!
//! Notifications are queued while the state lock is held and delivered
//! after it is released, so callbacks may call back into the normalizer.
//! The queue is drained by one thread at a time in the order the
//! notifications were computed: a callback never sees an older state after a
//! newer one, even when events for one instance arrive on several threads.


use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use playerseat_shared::{Axis, CanonicalKey, ConnectionState, KeySet, PlayerSlot};
use winit::keyboard::KeyCode;

use crate::device::DeviceId;
use crate::observer::{
    AxisCallback, ConnectionCallback, KeySetCallback, Registration, TopologyListener,
};
use crate::source::{Disposition, RawEvent, RawInputSource, RawSymbol};
use crate::sync::lock;

/// Stick magnitude above which a direction counts as pressed
pub const DEFAULT_DIRECTION_THRESHOLD: f32 = 0.5;

/// Binding lifecycle of one normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingState {
    /// No slot requested
    Unbound,
    /// Slot requested but no device currently holds it
    BoundNoDevice,
    /// Slot requested and a device feeds it
    BoundActive,
}

struct ControllerState {
    slot: Option<PlayerSlot>,
    device: Option<DeviceId>,
    /// Keys held through button edges
    button_keys: KeySet,
    /// Directional keys implied by the stick
    axis_keys: KeySet,
    /// Last continuous stick value
    stick: Axis,
    /// Axis reported to observers
    axis: Axis,
    direction_threshold: f32,
    connection: ConnectionState,
}

impl ControllerState {
    fn pressed(&self) -> KeySet {
        self.button_keys.union(self.axis_keys)
    }

    /// The stick while it is deflected, otherwise the direction buttons
    fn derive_axis(&self) -> Axis {
        if self.stick != Axis::ZERO {
            self.stick
        } else {
            Axis::from_directions(self.button_keys)
        }
    }

    fn binding_state(&self) -> BindingState {
        match (self.slot, self.device) {
            (None, _) => BindingState::Unbound,
            (Some(_), None) => BindingState::BoundNoDevice,
            (Some(_), Some(_)) => BindingState::BoundActive,
        }
    }

    /// Drop everything the previous device reported
    fn clear(&mut self, pending: &mut Pending) {
        if !self.pressed().is_empty() {
            pending.keys = Some(KeySet::EMPTY);
        }
        if self.axis != Axis::ZERO {
            pending.axis = Some(Axis::ZERO);
        }
        self.button_keys = KeySet::EMPTY;
        self.axis_keys = KeySet::EMPTY;
        self.stick = Axis::ZERO;
        self.axis = Axis::ZERO;
    }
}

#[derive(Default)]
struct Observers {
    key_set: Option<KeySetCallback>,
    axis: Option<AxisCallback>,
    connection: Option<ConnectionCallback>,
}

/// Notifications waiting for the state lock to be released
#[derive(Debug, Default)]
struct Pending {
    keys: Option<KeySet>,
    axis: Option<Axis>,
    connection: Option<ConnectionState>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.keys.is_none() && self.axis.is_none() && self.connection.is_none()
    }
}

#[derive(Default)]
struct Delivery {
    queue: VecDeque<Pending>,
    draining: bool,
}

/// Lets another thread take over draining if a callback panics
struct DrainReset<'a>(&'a Mutex<Delivery>);

impl Drop for DrainReset<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            lock(self.0, "normalizer delivery").draining = false;
        }
    }
}

struct Shared {
    source: Arc<dyn RawInputSource>,
    state: Mutex<ControllerState>,
    observers: Mutex<Observers>,
    delivery: Mutex<Delivery>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ControllerState> {
        lock(&self.state, "normalizer state")
    }

    /// Queue `pending` behind everything computed earlier, release the state
    /// lock and deliver
    fn publish(&self, state: MutexGuard<'_, ControllerState>, pending: Pending) {
        if !pending.is_empty() {
            lock(&self.delivery, "normalizer delivery")
                .queue
                .push_back(pending);
        }
        drop(state);
        self.drain();
    }

    /// Deliver queued notifications unless another call is already doing so
    fn drain(&self) {
        {
            let mut delivery = lock(&self.delivery, "normalizer delivery");
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }
        let _reset = DrainReset(&self.delivery);
        loop {
            let next = {
                let mut delivery = lock(&self.delivery, "normalizer delivery");
                match delivery.queue.pop_front() {
                    Some(pending) => pending,
                    None => {
                        delivery.draining = false;
                        return;
                    }
                }
            };
            self.dispatch(next);
        }
    }

    /// Re-resolve the bound device and re-read the connection tri-state
    fn refresh_locked(&self, state: &mut ControllerState, pending: &mut Pending) {
        let before = state.binding_state();
        let device = state.slot.and_then(|slot| self.source.resolve(slot));
        if device != state.device {
            state.clear(pending);
            state.device = device;
        }
        let after = state.binding_state();
        if before != after {
            tracing::debug!(slot = ?state.slot, ?device, from = ?before, to = ?after, "Binding state changed");
        }

        let connection = self.source.connection_state();
        if connection != state.connection {
            tracing::debug!(slot = ?state.slot, ?connection, "Connection state changed");
            state.connection = connection;
            pending.connection = Some(connection);
        }
    }

    fn refresh(&self) {
        let mut pending = Pending::default();
        let mut state = self.state();
        self.refresh_locked(&mut state, &mut pending);
        self.publish(state, pending);
    }

    /// Call the observers. Must be called without the state lock.
    fn dispatch(&self, pending: Pending) {
        let (key_set, axis, connection) = {
            let observers = lock(&self.observers, "normalizer observers");
            (
                observers.key_set.clone(),
                observers.axis.clone(),
                observers.connection.clone(),
            )
        };

        if let (Some(keys), Some(callback)) = (pending.keys, key_set) {
            callback(keys);
        }
        if let (Some(value), Some(callback)) = (pending.axis, axis) {
            callback(value);
        }
        if let (Some(state), Some(callback)) = (pending.connection, connection) {
            callback(state);
        }
    }

    /// Accept an event only from the device bound to this instance
    fn accept(&self, state: &ControllerState, device: DeviceId) -> Option<PlayerSlot> {
        let slot = state.slot?;
        (state.device == Some(device)).then_some(slot)
    }

    fn button_edge(&self, device: DeviceId, symbol: RawSymbol, is_down: bool) -> Disposition {
        let mut state = self.state();
        let Some(slot) = self.accept(&state, device) else {
            tracing::trace!(%device, ?symbol, "Edge from unbound device passed through");
            return Disposition::PassThrough;
        };
        let Some(key) = self.source.translate(slot, symbol) else {
            tracing::trace!(%slot, ?symbol, "Unmapped symbol passed through");
            return Disposition::PassThrough;
        };

        if is_down {
            state.button_keys.insert(key);
        } else {
            state.button_keys.remove(key);
        }
        let pressed = state.pressed();
        tracing::debug!(%slot, %key, is_down, keys = ?pressed, "Key edge");
        let mut pending = Pending {
            keys: Some(pressed),
            ..Pending::default()
        };

        let axis = state.derive_axis();
        if axis != state.axis {
            state.axis = axis;
            pending.axis = Some(axis);
        }
        self.publish(state, pending);
        Disposition::Consumed
    }

    fn axis(&self, device: DeviceId, x: f32, y: f32) -> Disposition {
        if !self.source.reports_axis() {
            return Disposition::PassThrough;
        }

        let mut state = self.state();
        let Some(slot) = self.accept(&state, device) else {
            tracing::trace!(%device, "Axis from unbound device passed through");
            return Disposition::PassThrough;
        };

        let mut pending = Pending::default();
        state.stick = Axis::new(x, y);
        let keys = state.stick.directions(state.direction_threshold);
        let axis = state.derive_axis();
        if axis != state.axis || keys != state.axis_keys {
            state.axis = axis;
            state.axis_keys = keys;
            tracing::trace!(%slot, x = axis.x, y = axis.y, "Axis changed");
            pending.axis = Some(axis);
            pending.keys = Some(state.pressed());
        }
        self.publish(state, pending);
        Disposition::Consumed
    }
}

impl TopologyListener for Shared {
    fn on_topology_changed(&self) {
        self.refresh();
    }
}

/// Canonical input state for one logical player
pub struct Normalizer {
    shared: Arc<Shared>,
    _registration: Option<Registration>,
}

impl Normalizer {
    /// Unbound normalizer reading from `source`
    pub fn new(source: Arc<dyn RawInputSource>) -> Self {
        let connection = source.connection_state();
        let shared = Arc::new(Shared {
            source: Arc::clone(&source),
            state: Mutex::new(ControllerState {
                slot: None,
                device: None,
                button_keys: KeySet::EMPTY,
                axis_keys: KeySet::EMPTY,
                stick: Axis::ZERO,
                axis: Axis::ZERO,
                direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
                connection,
            }),
            observers: Mutex::new(Observers::default()),
            delivery: Mutex::new(Delivery::default()),
        });
        let registration = source.subscribe(shared.clone());
        Self {
            shared,
            _registration: registration,
        }
    }

    /// Normalizer already bound to `slot`
    pub fn for_slot(source: Arc<dyn RawInputSource>, slot: PlayerSlot) -> Self {
        let normalizer = Self::new(source);
        normalizer.bind(slot);
        normalizer
    }

    /// Bind to a slot and re-resolve the device feeding it.
    ///
    /// State from a previously bound device is discarded if the device changes.
    pub fn bind(&self, slot: PlayerSlot) {
        let mut pending = Pending::default();
        let mut state = self.shared.state();
        state.slot = Some(slot);
        self.shared.refresh_locked(&mut state, &mut pending);
        self.shared.publish(state, pending);
    }

    /// Release the slot and discard all state
    pub fn unbind(&self) {
        let mut pending = Pending::default();
        let mut state = self.shared.state();
        state.slot = None;
        self.shared.refresh_locked(&mut state, &mut pending);
        self.shared.publish(state, pending);
    }

    /// Apply a button or key edge from `device`
    pub fn on_button_edge(&self, device: DeviceId, symbol: RawSymbol, is_down: bool) -> Disposition {
        self.shared.button_edge(device, symbol, is_down)
    }

    /// Apply a keyboard edge
    pub fn on_key(&self, key: KeyCode, is_down: bool) -> Disposition {
        self.on_button_edge(DeviceId::KEYBOARD, RawSymbol::Key(key), is_down)
    }

    /// Apply a continuous axis value from `device`. Values are clamped into range.
    pub fn on_axis(&self, device: DeviceId, x: f32, y: f32) -> Disposition {
        self.shared.axis(device, x, y)
    }

    /// Dispatch a raw device event
    pub fn handle(&self, event: &RawEvent) -> Disposition {
        match *event {
            RawEvent::Button {
                device,
                symbol,
                pressed,
            } => self.on_button_edge(device, symbol, pressed),
            RawEvent::Axis { device, x, y } => self.on_axis(device, x, y),
        }
    }

    /// Replace the key-set callback and call it with the current set
    pub fn observe_key_set<F>(&self, callback: F)
    where
        F: Fn(KeySet) + Send + Sync + 'static,
    {
        lock(&self.shared.observers, "normalizer observers").key_set = Some(Arc::new(callback));
        self.refresh_and_fire(|state, pending| {
            pending.keys.get_or_insert(state.pressed());
        });
    }

    /// Replace the axis callback and call it with the current axis
    pub fn observe_axis<F>(&self, callback: F)
    where
        F: Fn(Axis) + Send + Sync + 'static,
    {
        lock(&self.shared.observers, "normalizer observers").axis = Some(Arc::new(callback));
        self.refresh_and_fire(|state, pending| {
            pending.axis.get_or_insert(state.axis);
        });
    }

    /// Replace the connection callback and call it with the current state
    pub fn observe_connection_state<F>(&self, callback: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        lock(&self.shared.observers, "normalizer observers").connection = Some(Arc::new(callback));
        self.refresh_and_fire(|state, pending| {
            pending.connection.get_or_insert(state.connection);
        });
    }

    fn refresh_and_fire(&self, initial: impl FnOnce(&ControllerState, &mut Pending)) {
        let mut pending = Pending::default();
        let mut state = self.shared.state();
        self.shared.refresh_locked(&mut state, &mut pending);
        initial(&*state, &mut pending);
        self.shared.publish(state, pending);
    }

    /// Re-resolve the device and connection state now
    pub fn refresh(&self) {
        self.shared.refresh();
    }

    pub fn current_pressed_keys(&self) -> KeySet {
        self.shared.state().pressed()
    }

    pub fn is_pressed(&self, key: CanonicalKey) -> bool {
        self.current_pressed_keys().contains(key)
    }

    pub fn current_axis(&self) -> Axis {
        self.shared.state().axis
    }

    pub fn binding_state(&self) -> BindingState {
        self.shared.state().binding_state()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.shared.state().connection
    }

    /// Prompt for the current connection state, empty when satisfied
    pub fn status_message(&self) -> &'static str {
        self.connection_state().message()
    }

    pub fn slot(&self) -> Option<PlayerSlot> {
        self.shared.state().slot
    }

    pub fn bound_device(&self) -> Option<DeviceId> {
        self.shared.state().device
    }

    pub fn direction_threshold(&self) -> f32 {
        self.shared.state().direction_threshold
    }

    /// Change the stick threshold (clamped into 0.0-1.0) and re-derive directions
    pub fn set_direction_threshold(&self, threshold: f32) {
        let mut pending = Pending::default();
        let mut state = self.shared.state();
        state.direction_threshold = if threshold.is_nan() {
            DEFAULT_DIRECTION_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        let keys = state.stick.directions(state.direction_threshold);
        if keys != state.axis_keys {
            state.axis_keys = keys;
            pending.keys = Some(state.pressed());
        }
        self.shared.publish(state, pending);
    }

    /// Builder form of [`Normalizer::set_direction_threshold`]
    pub fn with_direction_threshold(self, threshold: f32) -> Self {
        self.set_direction_threshold(threshold);
        self
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state();
        f.debug_struct("Normalizer")
            .field("kind", &self.shared.source.kind())
            .field("slot", &state.slot)
            .field("device", &state.device)
            .field("pressed", &state.pressed())
            .field("axis", &state.axis)
            .field("connection", &state.connection)
            .finish()
    }
}
