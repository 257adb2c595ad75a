//! Uptime records.

use crate::UptimeError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use tracing::trace;
use warpset_types::{NetworkId, NodeId};

/// Storage of per-validator uptime.
pub trait UptimeState: Send + Sync {
    /// Accumulated uptime and when it was last updated.
    fn uptime(&self, node: NodeId, network: NetworkId) -> Result<(Duration, SystemTime), UptimeError>;

    /// Overwrite the accumulated uptime.
    fn set_uptime(
        &self,
        node: NodeId,
        network: NetworkId,
        uptime: Duration,
        last_updated: SystemTime,
    ) -> Result<(), UptimeError>;

    /// When the validator started validating `network`.
    fn start_time(&self, node: NodeId, network: NetworkId) -> Result<SystemTime, UptimeError>;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    uptime: Duration,
    last_updated: SystemTime,
    start_time: SystemTime,
}

/// In-memory [`UptimeState`].
///
/// Validators must be added with [`add_validator`](Self::add_validator)
/// before their uptime can be read or written.
#[derive(Debug, Default)]
pub struct MemoryUptimeState {
    entries: RwLock<HashMap<(NodeId, NetworkId), Entry>>,
}

impl MemoryUptimeState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `node` on `network` with zero uptime.
    pub fn add_validator(
        &self,
        node: NodeId,
        network: NetworkId,
        start_time: SystemTime,
    ) -> Result<(), UptimeError> {
        let mut entries = self.entries.write();
        if entries.contains_key(&(node, network)) {
            return Err(UptimeError::AlreadyTracked { node, network });
        }
        entries.insert(
            (node, network),
            Entry {
                uptime: Duration::ZERO,
                last_updated: start_time,
                start_time,
            },
        );
        Ok(())
    }

    /// Stop tracking `node` on `network`. Returns whether it was tracked.
    pub fn remove_validator(&self, node: NodeId, network: NetworkId) -> bool {
        self.entries.write().remove(&(node, network)).is_some()
    }
}

impl UptimeState for MemoryUptimeState {
    fn uptime(&self, node: NodeId, network: NetworkId) -> Result<(Duration, SystemTime), UptimeError> {
        self.entries
            .read()
            .get(&(node, network))
            .map(|e| (e.uptime, e.last_updated))
            .ok_or(UptimeError::NotTracked { node, network })
    }

    fn set_uptime(
        &self,
        node: NodeId,
        network: NetworkId,
        uptime: Duration,
        last_updated: SystemTime,
    ) -> Result<(), UptimeError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&(node, network))
            .ok_or(UptimeError::NotTracked { node, network })?;
        entry.uptime = uptime;
        entry.last_updated = last_updated;
        trace!(node = %node, network = %network, uptime = ?uptime, "Uptime updated");
        Ok(())
    }

    fn start_time(&self, node: NodeId, network: NetworkId) -> Result<SystemTime, UptimeError> {
        self.entries
            .read()
            .get(&(node, network))
            .map(|e| e.start_time)
            .ok_or(UptimeError::NotTracked { node, network })
    }
}
