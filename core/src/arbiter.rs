//! Player slot arbiter
//!
//! Owns the connection topology for one application. Device connect and
//! disconnect events update the topology, drive the slot indicator for every
//! device whose slot changed, then notify every registered listener.

use std::sync::{Arc, Mutex};

use playerseat_shared::{ConnectionState, PlayerSlot};

use crate::config::InputConfig;
use crate::device::{DeviceClass, DeviceEvent, DeviceId};
use crate::observer::{self, Registration, SharedRegistry, TopologyListener};
use crate::source::RawEvent;
use crate::sync::lock;
use crate::topology::{ConnectionTopology, SlotChange, SlotChanges};

/// Sink for "show this player number on the device" requests.
///
/// Best effort: the arbiter never waits for or checks the result.
pub trait SlotIndicator: Send + Sync {
    fn show_slot(&self, device: DeviceId, slot: Option<PlayerSlot>);
}

impl<F> SlotIndicator for F
where
    F: Fn(DeviceId, Option<PlayerSlot>) + Send + Sync,
{
    fn show_slot(&self, device: DeviceId, slot: Option<PlayerSlot>) {
        self(device, slot)
    }
}

/// Indicator that only logs, for platforms without player LEDs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingIndicator;

impl SlotIndicator for TracingIndicator {
    fn show_slot(&self, device: DeviceId, slot: Option<PlayerSlot>) {
        match slot {
            Some(slot) => tracing::debug!(%device, %slot, "Slot indicator set"),
            None => tracing::debug!(%device, "Slot indicator cleared"),
        }
    }
}

/// Assigns connected devices to player slots and fans out topology changes
pub struct SlotArbiter {
    topology: Mutex<ConnectionTopology>,
    listeners: SharedRegistry,
    indicator: Box<dyn SlotIndicator>,
}

impl SlotArbiter {
    /// Arbiter with `slot_count` slots (clamped into 1-4) and a logging indicator
    pub fn new(slot_count: usize, prefer_full_feature: bool) -> Self {
        Self::with_indicator(slot_count, prefer_full_feature, Box::new(TracingIndicator))
    }

    pub fn with_indicator(
        slot_count: usize,
        prefer_full_feature: bool,
        indicator: Box<dyn SlotIndicator>,
    ) -> Self {
        Self {
            topology: Mutex::new(ConnectionTopology::new(slot_count, prefer_full_feature)),
            listeners: SharedRegistry::default(),
            indicator,
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(config.slot_count, config.prefer_full_feature)
    }

    /// Record a newly connected device and assign it a slot if one is available.
    ///
    /// Already connected devices are ignored without a rebroadcast.
    pub fn on_device_connected(&self, device: DeviceId, class: DeviceClass) {
        let (changes, bound) = {
            let mut topology = self.topology();
            let Some(changes) = topology.connect(device, class) else {
                tracing::debug!(%device, "Device already connected");
                return;
            };
            (changes, topology.slot_of(device))
        };

        tracing::info!(%device, ?class, "Device connected");
        if bound.is_none() {
            tracing::warn!(%device, "No free player slot; device left unassigned");
        }
        self.publish(&changes);
    }

    /// Forget a device and hand its slot to a waiting device, if any.
    pub fn on_device_disconnected(&self, device: DeviceId) {
        let Some(changes) = self.topology().disconnect(device) else {
            tracing::debug!(%device, "Ignoring disconnect of unknown device");
            return;
        };

        tracing::info!(%device, "Device disconnected");
        self.publish(&changes);
    }

    /// Handle a connection event and pass raw input through for normalizers
    pub fn apply(&self, event: &DeviceEvent) -> Option<RawEvent> {
        match *event {
            DeviceEvent::Connected { device, class } => {
                self.on_device_connected(device, class);
                None
            }
            DeviceEvent::Disconnected { device } => {
                self.on_device_disconnected(device);
                None
            }
            DeviceEvent::Raw(raw) => Some(raw),
        }
    }

    /// Device currently holding a slot
    pub fn resolve_device(&self, slot: PlayerSlot) -> Option<DeviceId> {
        self.topology().device_in(slot)
    }

    pub fn slot_of(&self, device: DeviceId) -> Option<PlayerSlot> {
        self.topology().slot_of(device)
    }

    pub fn connected_count(&self) -> usize {
        self.topology().connected_count()
    }

    pub fn bound_count(&self) -> usize {
        self.topology().bound_count()
    }

    pub fn slot_count(&self) -> usize {
        self.topology().slot_count()
    }

    /// (slot, device) pairs sorted by slot
    pub fn bindings(&self) -> Vec<(PlayerSlot, DeviceId)> {
        self.topology().bindings()
    }

    /// Tri-state derived from bound devices and configured slots
    pub fn connection_state(&self) -> ConnectionState {
        let topology = self.topology();
        ConnectionState::from_counts(topology.bound_count(), topology.slot_count())
    }

    /// Register a listener for topology changes
    pub fn subscribe(&self, listener: Arc<dyn TopologyListener>) -> Registration {
        observer::register(&self.listeners, listener)
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners, "listener registry").len()
    }

    /// Notify every registered listener.
    ///
    /// Listeners are called outside all arbiter locks, so they may query the
    /// arbiter or drop their own registration.
    pub fn rebroadcast(&self) {
        let listeners = lock(&self.listeners, "listener registry").snapshot();
        tracing::trace!(count = listeners.len(), "Rebroadcasting topology");
        for listener in listeners {
            listener.on_topology_changed();
        }
    }

    fn publish(&self, changes: &SlotChanges) {
        for change in changes {
            match *change {
                SlotChange::Assigned { device, slot } => {
                    tracing::info!(%device, %slot, "Device assigned to slot");
                    self.indicator.show_slot(device, Some(slot));
                }
                SlotChange::Evicted { device, slot } => {
                    tracing::info!(%device, %slot, "Device yielded slot to a full-feature device");
                    self.indicator.show_slot(device, None);
                }
                SlotChange::Released { device, slot } => {
                    tracing::debug!(%device, %slot, "Slot released");
                }
            }
        }
        self.rebroadcast();
    }

    fn topology(&self) -> std::sync::MutexGuard<'_, ConnectionTopology> {
        lock(&self.topology, "topology")
    }
}

impl Default for SlotArbiter {
    fn default() -> Self {
        Self::from_config(&InputConfig::default())
    }
}

impl std::fmt::Debug for SlotArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotArbiter")
            .field("topology", &*self.topology())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type IndicatorLog = Arc<Mutex<Vec<(DeviceId, Option<PlayerSlot>)>>>;

    fn recording_arbiter(slots: usize, prefer: bool) -> (SlotArbiter, IndicatorLog) {
        let log = IndicatorLog::default();
        let sink = log.clone();
        let arbiter = SlotArbiter::with_indicator(
            slots,
            prefer,
            Box::new(move |device: DeviceId, slot: Option<PlayerSlot>| {
                sink.lock().unwrap().push((device, slot))
            }),
        );
        (arbiter, log)
    }

    struct Counter(AtomicUsize);

    impl TopologyListener for Counter {
        fn on_topology_changed(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_connect_drives_indicator() {
        let (arbiter, log) = recording_arbiter(2, true);
        arbiter.on_device_connected(DeviceId(10), DeviceClass::Full);
        arbiter.on_device_connected(DeviceId(11), DeviceClass::Full);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (DeviceId(10), Some(PlayerSlot::ONE)),
                (DeviceId(11), Some(PlayerSlot::TWO)),
            ]
        );
        assert_eq!(arbiter.resolve_device(PlayerSlot::TWO), Some(DeviceId(11)));
    }

    #[test]
    fn test_eviction_clears_indicator() {
        let (arbiter, log) = recording_arbiter(1, true);
        arbiter.on_device_connected(DeviceId(1), DeviceClass::Minimal);
        arbiter.on_device_connected(DeviceId(2), DeviceClass::Full);

        let log = log.lock().unwrap();
        assert_eq!(log[1], (DeviceId(1), None));
        assert_eq!(log[2], (DeviceId(2), Some(PlayerSlot::ONE)));
    }

    #[test]
    fn test_rebroadcast_on_every_change_only() {
        let arbiter = SlotArbiter::new(2, true);
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let _registration = arbiter.subscribe(counter.clone());

        arbiter.on_device_connected(DeviceId(1), DeviceClass::Full);
        arbiter.on_device_connected(DeviceId(1), DeviceClass::Full);
        arbiter.on_device_disconnected(DeviceId(9));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        arbiter.on_device_disconnected(DeviceId(1));
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_connection_state_two_slots() {
        let arbiter = SlotArbiter::new(2, true);
        assert_eq!(arbiter.connection_state(), ConnectionState::NoControllers);

        arbiter.on_device_connected(DeviceId(1), DeviceClass::Full);
        assert_eq!(arbiter.connection_state(), ConnectionState::OneController);

        arbiter.on_device_connected(DeviceId(2), DeviceClass::Full);
        assert_eq!(arbiter.connection_state(), ConnectionState::AllGood);

        arbiter.on_device_disconnected(DeviceId(1));
        assert_eq!(arbiter.connection_state(), ConnectionState::OneController);
        assert_eq!(arbiter.slot_of(DeviceId(2)), Some(PlayerSlot::TWO));
        assert_eq!(arbiter.resolve_device(PlayerSlot::ONE), None);
    }

    #[test]
    fn test_apply_splits_events() {
        let arbiter = SlotArbiter::new(4, true);
        let connect = DeviceEvent::Connected {
            device: DeviceId(3),
            class: DeviceClass::Full,
        };
        assert_eq!(arbiter.apply(&connect), None);
        assert_eq!(arbiter.connected_count(), 1);

        let raw = RawEvent::Axis {
            device: DeviceId(3),
            x: 0.25,
            y: 0.0,
        };
        assert_eq!(arbiter.apply(&DeviceEvent::Raw(raw)), Some(raw));

        arbiter.apply(&DeviceEvent::Disconnected { device: DeviceId(3) });
        assert_eq!(arbiter.connected_count(), 0);
    }

    #[test]
    fn test_listener_can_query_arbiter() {
        struct Querying {
            arbiter: Arc<SlotArbiter>,
            seen: Mutex<Vec<usize>>,
        }
        impl TopologyListener for Querying {
            fn on_topology_changed(&self) {
                let bound = self.arbiter.bound_count();
                self.seen.lock().unwrap().push(bound);
            }
        }

        let arbiter = Arc::new(SlotArbiter::new(4, true));
        let listener = Arc::new(Querying {
            arbiter: arbiter.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let registration = arbiter.subscribe(listener.clone());

        arbiter.on_device_connected(DeviceId(1), DeviceClass::Full);
        arbiter.on_device_connected(DeviceId(2), DeviceClass::Minimal);
        assert_eq!(*listener.seen.lock().unwrap(), vec![1, 2]);

        drop(registration);
        assert_eq!(arbiter.listener_count(), 0);
    }
}
