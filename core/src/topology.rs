//! Device to player slot assignment
//!
//! [`ConnectionTopology`] is the plain data structure behind the arbiter: the
//! connected devices in connection order and the slot each bound device
//! holds. It has no locking and no side effects; every mutation returns the
//! list of slot changes so the caller can log them and drive indicators.

use hashbrown::HashMap;
use playerseat_shared::{MAX_SLOTS, PlayerSlot};
use smallvec::SmallVec;

use crate::device::{DeviceClass, DeviceId};

/// One slot binding that changed during a topology update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    /// Device now holds the slot
    Assigned { device: DeviceId, slot: PlayerSlot },
    /// Device disconnected and gave up the slot
    Released { device: DeviceId, slot: PlayerSlot },
    /// Connected device lost the slot to a full-feature device
    Evicted { device: DeviceId, slot: PlayerSlot },
}

/// Changes produced by one topology update
pub type SlotChanges = SmallVec<[SlotChange; MAX_SLOTS]>;

/// Connected devices and their slot bindings
#[derive(Debug, Clone)]
pub struct ConnectionTopology {
    slot_count: usize,
    prefer_full_feature: bool,
    /// Connected devices in connection order
    connected: Vec<(DeviceId, DeviceClass)>,
    slots: HashMap<DeviceId, PlayerSlot>,
}

impl ConnectionTopology {
    /// Empty topology. `slot_count` is clamped into 1-4.
    pub fn new(slot_count: usize, prefer_full_feature: bool) -> Self {
        Self {
            slot_count: slot_count.clamp(1, MAX_SLOTS),
            prefer_full_feature,
            connected: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn prefer_full_feature(&self) -> bool {
        self.prefer_full_feature
    }

    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }

    pub fn bound_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_connected(&self, device: DeviceId) -> bool {
        self.connected.iter().any(|(id, _)| *id == device)
    }

    /// Slot held by a device
    pub fn slot_of(&self, device: DeviceId) -> Option<PlayerSlot> {
        self.slots.get(&device).copied()
    }

    /// Device holding a slot
    pub fn device_in(&self, slot: PlayerSlot) -> Option<DeviceId> {
        self.slots
            .iter()
            .find(|(_, s)| **s == slot)
            .map(|(device, _)| *device)
    }

    /// Connected devices without a slot, in connection order
    pub fn waiting(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.connected
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !self.slots.contains_key(id))
    }

    /// (slot, device) pairs sorted by slot
    pub fn bindings(&self) -> Vec<(PlayerSlot, DeviceId)> {
        let mut bindings: Vec<_> = self.slots.iter().map(|(d, s)| (*s, *d)).collect();
        bindings.sort();
        bindings
    }

    /// Add a device. Returns `None` when it was already connected.
    pub fn connect(&mut self, device: DeviceId, class: DeviceClass) -> Option<SlotChanges> {
        if self.is_connected(device) {
            return None;
        }
        self.connected.push((device, class));
        Some(self.rebalance())
    }

    /// Remove a device and its binding. Returns `None` for unknown devices.
    pub fn disconnect(&mut self, device: DeviceId) -> Option<SlotChanges> {
        let pos = self.connected.iter().position(|(id, _)| *id == device)?;
        self.connected.remove(pos);

        let mut changes = SlotChanges::new();
        if let Some(slot) = self.slots.remove(&device) {
            changes.push(SlotChange::Released { device, slot });
        }
        changes.extend(self.rebalance());
        Some(changes)
    }

    /// Hand free slots to waiting devices.
    ///
    /// Waiting devices take the lowest free slot in connection order. With
    /// the full-feature preference on, waiting full devices go first, and a
    /// full device that finds no free slot evicts the most recently
    /// connected bound minimal device.
    fn rebalance(&mut self) -> SlotChanges {
        let mut changes = SlotChanges::new();

        let mut waiting: Vec<(DeviceId, DeviceClass)> = self
            .connected
            .iter()
            .filter(|(id, _)| !self.slots.contains_key(id))
            .copied()
            .collect();
        if self.prefer_full_feature {
            // Stable sort keeps connection order within each class
            waiting.sort_by_key(|(_, class)| *class != DeviceClass::Full);
        }

        for (device, class) in waiting {
            if let Some(slot) = self.lowest_free_slot() {
                self.slots.insert(device, slot);
                changes.push(SlotChange::Assigned { device, slot });
                continue;
            }
            if !self.prefer_full_feature || class != DeviceClass::Full {
                continue;
            }
            let Some(victim) = self.newest_bound_minimal() else {
                continue;
            };
            if let Some(slot) = self.slots.remove(&victim) {
                changes.push(SlotChange::Evicted {
                    device: victim,
                    slot,
                });
                self.slots.insert(device, slot);
                changes.push(SlotChange::Assigned { device, slot });
            }
        }

        changes
    }

    fn lowest_free_slot(&self) -> Option<PlayerSlot> {
        PlayerSlot::first(self.slot_count).find(|slot| !self.slots.values().any(|s| s == slot))
    }

    fn newest_bound_minimal(&self) -> Option<DeviceId> {
        self.connected
            .iter()
            .rev()
            .find(|(id, class)| *class == DeviceClass::Minimal && self.slots.contains_key(id))
            .map(|(id, _)| *id)
    }
}
