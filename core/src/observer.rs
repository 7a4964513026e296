//! Callback types and the topology listener registry
//!
//! Normalizers register with the arbiter as [`TopologyListener`]s and keep the
//! returned [`Registration`] guard. Dropping the guard removes the listener,
//! which is what breaks the arbiter -> listener -> source -> arbiter cycle.

use std::sync::{Arc, Mutex};

use playerseat_shared::{Axis, ConnectionState, KeySet};

use crate::sync::lock;

/// Called with the full pressed set after every mapped edge
pub type KeySetCallback = Arc<dyn Fn(KeySet) + Send + Sync>;
/// Called with the new axis when it changes
pub type AxisCallback = Arc<dyn Fn(Axis) + Send + Sync>;
/// Called when the connection tri-state changes
pub type ConnectionCallback = Arc<dyn Fn(ConnectionState) + Send + Sync>;

/// Receives a notification after every slot assignment change
pub trait TopologyListener: Send + Sync {
    fn on_topology_changed(&self);
}

/// Listener list with stable ids
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, Arc<dyn TopologyListener>)>,
}

impl ListenerRegistry {
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Copy of the current listeners, for calling outside the lock
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn TopologyListener>> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    fn insert(&mut self, listener: Arc<dyn TopologyListener>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove(&mut self, id: u64) {
        self.listeners.retain(|(other, _)| *other != id);
    }
}

pub(crate) type SharedRegistry = Arc<Mutex<ListenerRegistry>>;

/// Add a listener and return the guard that removes it
pub(crate) fn register(registry: &SharedRegistry, listener: Arc<dyn TopologyListener>) -> Registration {
    let id = lock(registry, "listener registry").insert(listener);
    tracing::debug!(id, "Topology listener registered");
    Registration {
        registry: Arc::clone(registry),
        id,
    }
}

/// Keeps a topology listener registered until dropped
#[must_use = "dropping the registration removes the listener immediately"]
pub struct Registration {
    registry: SharedRegistry,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        lock(&self.registry, "listener registry").remove(self.id);
        tracing::debug!(id = self.id, "Topology listener removed");
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
