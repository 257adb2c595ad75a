//! Listener that records every notification it receives.

use parking_lot::Mutex;
use warpset_types::{NetworkId, NodeId};
use warpset_validators::{ManagerListener, SetListener};

/// One registry notification.
///
/// `network` is `None` for notifications delivered through [`SetListener`],
/// which are implicitly scoped to one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    Added {
        network: Option<NetworkId>,
        node: NodeId,
        light: u64,
    },
    Removed {
        network: Option<NetworkId>,
        node: NodeId,
        light: u64,
    },
    LightChanged {
        network: Option<NetworkId>,
        node: NodeId,
        old_light: u64,
        new_light: u64,
    },
}

/// Records notifications in delivery order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ListenerEvent>>,
}

impl RecordingListener {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    pub fn events(&self) -> Vec<ListenerEvent> {
        self.events.lock().clone()
    }

    /// Take and clear the events received so far.
    pub fn drain(&self) -> Vec<ListenerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    fn push(&self, event: ListenerEvent) {
        self.events.lock().push(event);
    }
}

impl ManagerListener for RecordingListener {
    fn on_validator_added(&self, network: NetworkId, node: NodeId, light: u64) {
        self.push(ListenerEvent::Added {
            network: Some(network),
            node,
            light,
        });
    }

    fn on_validator_removed(&self, network: NetworkId, node: NodeId, light: u64) {
        self.push(ListenerEvent::Removed {
            network: Some(network),
            node,
            light,
        });
    }

    fn on_validator_light_changed(
        &self,
        network: NetworkId,
        node: NodeId,
        old_light: u64,
        new_light: u64,
    ) {
        self.push(ListenerEvent::LightChanged {
            network: Some(network),
            node,
            old_light,
            new_light,
        });
    }
}

impl SetListener for RecordingListener {
    fn on_validator_added(&self, node: NodeId, light: u64) {
        self.push(ListenerEvent::Added {
            network: None,
            node,
            light,
        });
    }

    fn on_validator_removed(&self, node: NodeId, light: u64) {
        self.push(ListenerEvent::Removed {
            network: None,
            node,
            light,
        });
    }

    fn on_validator_light_changed(&self, node: NodeId, old_light: u64, new_light: u64) {
        self.push(ListenerEvent::LightChanged {
            network: None,
            node,
            old_light,
            new_light,
        });
    }
}
