//! Authoritative per-network weighted validator membership.
//!
//! One [`ValidatorRegistry`] tracks any number of networks. Each network maps
//! node IDs to a [`ValidatorRecord`]. All state sits behind a single
//! reader/writer lock: mutations and listener registration take it
//! exclusively, every read takes it shared.
//!
//! The mutation API is total. Operations on unknown networks or nodes are
//! no-ops reported through the return value, never errors.
//!
//! # Invariants
//!
//! - No record with zero weight is ever stored. Removing weight down to zero
//!   or staking zero over an existing record deletes the record, and deleting a network's last record deletes the
//!   network entry.
//! - Listeners observe mutations in the order they were applied, because they
//!   are notified while the write lock is still held.

use crate::{
    ManagerListener, RegistryConfig, SetListener, ValidatorInfo, ValidatorRecord, ValidatorSet,
};
use parking_lot::{Mutex, RwLock};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use warpset_types::{sum_weights, NetworkId, NodeId, TxId, WeightOverflow};

type NetworkValidators = HashMap<NodeId, ValidatorRecord>;

/// Everything guarded by the registry lock.
#[derive(Default)]
struct RegistryState {
    validators: HashMap<NetworkId, NetworkValidators>,
    listeners: Vec<Arc<dyn ManagerListener>>,
    set_listeners: HashMap<NetworkId, Vec<Arc<dyn SetListener>>>,
}

impl RegistryState {
    fn notify_added(&self, network: NetworkId, node: NodeId, light: u64) {
        for listener in &self.listeners {
            listener.on_validator_added(network, node, light);
        }
        for listener in self.set_listeners.get(&network).into_iter().flatten() {
            listener.on_validator_added(node, light);
        }
    }

    fn notify_removed(&self, network: NetworkId, node: NodeId, light: u64) {
        for listener in &self.listeners {
            listener.on_validator_removed(network, node, light);
        }
        for listener in self.set_listeners.get(&network).into_iter().flatten() {
            listener.on_validator_removed(node, light);
        }
    }

    fn notify_light_changed(&self, network: NetworkId, node: NodeId, old: u64, new: u64) {
        for listener in &self.listeners {
            listener.on_validator_light_changed(network, node, old, new);
        }
        for listener in self.set_listeners.get(&network).into_iter().flatten() {
            listener.on_validator_light_changed(node, old, new);
        }
    }
}

/// Thread-safe registry of weighted validators, keyed by network.
pub struct ValidatorRegistry {
    state: RwLock<RegistryState>,
    /// Present only when sampling is seeded.
    sampler: Option<Mutex<ChaCha8Rng>>,
    config: RegistryConfig,
}

impl ValidatorRegistry {
    /// Create an empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            sampler: config
                .sample_seed
                .map(|seed| Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            config,
        }
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutation
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert or overwrite the record for `(network, node)`.
    ///
    /// No uniqueness check is made against other nodes' keys; validators
    /// sharing a key are merged only during canonicalisation. Returns the
    /// record that was replaced, if any.
    pub fn add_staker(
        &self,
        network: NetworkId,
        node: NodeId,
        public_key: Vec<u8>,
        tx_id: TxId,
        light: u64,
    ) -> Option<ValidatorRecord> {
        self.add_record(network, ValidatorRecord::new(node, public_key, tx_id, light))
    }

    /// Insert or overwrite a full record (including any Ringtail key).
    ///
    /// A zero-weight record is never stored: staking zero deletes any
    /// existing record for the node (and its network if it was the last
    /// record) and returns it.
    pub fn add_record(&self, network: NetworkId, record: ValidatorRecord) -> Option<ValidatorRecord> {
        let mut state = self.state.write();

        if record.light == 0 {
            let node = record.node_id;
            let validators = state.validators.get_mut(&network)?;
            let Some(previous) = validators.remove(&node) else {
                debug!(network = %network, node = %node, "Ignoring zero-weight staker");
                return None;
            };
            if validators.is_empty() {
                state.validators.remove(&network);
                debug!(network = %network, "Last validator removed, dropping network");
            }
            debug!(network = %network, node = %node, light = previous.light, "Validator removed by zero-weight stake");
            state.notify_removed(network, node, previous.light);
            return Some(previous);
        }

        let node = record.node_id;
        let light = record.light;
        let previous = state
            .validators
            .entry(network)
            .or_default()
            .insert(node, record);

        trace!(network = %network, node = %node, light, "Validator added");
        state.notify_added(network, node, light);
        previous
    }

    /// Increase the weight of an existing validator.
    ///
    /// Returns `false` (and changes nothing) when the validator is unknown.
    /// Weight saturates at `u64::MAX`.
    pub fn add_weight(&self, network: NetworkId, node: NodeId, delta: u64) -> bool {
        let mut state = self.state.write();
        let Some(record) = state
            .validators
            .get_mut(&network)
            .and_then(|validators| validators.get_mut(&node))
        else {
            return false;
        };

        let old = record.light;
        let new = old.checked_add(delta).unwrap_or_else(|| {
            warn!(network = %network, node = %node, old, delta, "Validator weight saturated");
            u64::MAX
        });
        record.light = new;

        if new != old {
            state.notify_light_changed(network, node, old, new);
        }
        true
    }

    /// Decrease the weight of an existing validator.
    ///
    /// Removing more than the current weight clamps to zero. A record whose
    /// weight reaches zero is deleted, and so is its network if it was the
    /// last record. Returns `false` (and changes nothing) when the validator
    /// is unknown.
    pub fn remove_weight(&self, network: NetworkId, node: NodeId, delta: u64) -> bool {
        let mut state = self.state.write();
        let Some(validators) = state.validators.get_mut(&network) else {
            return false;
        };
        let Some(record) = validators.get_mut(&node) else {
            return false;
        };

        let old = record.light;
        let new = old.saturating_sub(delta);

        if new > 0 {
            record.light = new;
            if new != old {
                state.notify_light_changed(network, node, old, new);
            }
            return true;
        }

        validators.remove(&node);
        if validators.is_empty() {
            state.validators.remove(&network);
            debug!(network = %network, "Last validator removed, dropping network");
        }
        debug!(network = %network, node = %node, light = old, "Validator removed");
        state.notify_removed(network, node, old);
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Listeners
    // ═══════════════════════════════════════════════════════════════════════

    /// Register a listener for every network.
    ///
    /// Unless replay is disabled in the configuration, the listener first
    /// receives one added notification per existing record. It must not call
    /// back into this registry.
    pub fn register_listener(&self, listener: Arc<dyn ManagerListener>) {
        let mut state = self.state.write();
        if self.config.replay_on_register {
            for (network, validators) in &state.validators {
                for (node, record) in validators {
                    listener.on_validator_added(*network, *node, record.light);
                }
            }
        }
        state.listeners.push(listener);
    }

    /// Register a listener for a single network.
    ///
    /// Replays the network's existing records like
    /// [`register_listener`](Self::register_listener).
    pub fn register_set_listener(&self, network: NetworkId, listener: Arc<dyn SetListener>) {
        let mut state = self.state.write();
        if self.config.replay_on_register {
            for (node, record) in state.validators.get(&network).into_iter().flatten() {
                listener.on_validator_added(*node, record.light);
            }
        }
        state
            .set_listeners
            .entry(network)
            .or_default()
            .push(listener);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reads
    // ═══════════════════════════════════════════════════════════════════════

    /// Number of networks with at least one validator.
    pub fn num_networks(&self) -> usize {
        self.state.read().validators.len()
    }

    /// Snapshot of a network's validators; empty for unknown networks.
    pub fn validators(&self, network: NetworkId) -> ValidatorSet {
        let state = self.state.read();
        let infos = state
            .validators
            .get(&network)
            .into_iter()
            .flatten()
            .map(|(node, record)| ValidatorInfo {
                node_id: *node,
                light: record.light,
            })
            .collect();
        ValidatorSet::new(infos)
    }

    /// Copy of a single record.
    pub fn get_validator(&self, network: NetworkId, node: NodeId) -> Option<ValidatorRecord> {
        self.state
            .read()
            .validators
            .get(&network)
            .and_then(|validators| validators.get(&node))
            .cloned()
    }

    /// Weight of a validator; zero when unknown.
    pub fn get_light(&self, network: NetworkId, node: NodeId) -> u64 {
        self.state
            .read()
            .validators
            .get(&network)
            .and_then(|validators| validators.get(&node))
            .map_or(0, |record| record.light)
    }

    /// Weight of a validator under its older name.
    #[deprecated(note = "use `get_light`")]
    pub fn get_weight(&self, network: NetworkId, node: NodeId) -> u64 {
        self.get_light(network, node)
    }

    /// Total weight of a network; zero when unknown.
    pub fn total_light(&self, network: NetworkId) -> Result<u64, WeightOverflow> {
        let state = self.state.read();
        sum_weights(
            state
                .validators
                .get(&network)
                .into_iter()
                .flat_map(|validators| validators.values().map(|r| r.light)),
        )
    }

    /// Total weight of a network under its older name.
    #[deprecated(note = "use `total_light`")]
    pub fn total_weight(&self, network: NetworkId) -> Result<u64, WeightOverflow> {
        self.total_light(network)
    }

    /// Number of validators in a network.
    pub fn count(&self, network: NetworkId) -> usize {
        self.state
            .read()
            .validators
            .get(&network)
            .map_or(0, HashMap::len)
    }

    /// Alias for [`count`](Self::count).
    pub fn num_validators(&self, network: NetworkId) -> usize {
        self.count(network)
    }

    /// Up to `size` node IDs from a network.
    ///
    /// Returns the whole population when `size` exceeds it and an empty
    /// vector for unknown networks. Order and selection follow
    /// [`RegistryConfig::sample_seed`].
    pub fn sample(&self, network: NetworkId, size: usize) -> Vec<NodeId> {
        let state = self.state.read();
        let Some(validators) = state.validators.get(&network) else {
            return Vec::new();
        };

        match &self.sampler {
            None => validators.keys().take(size).copied().collect(),
            Some(sampler) => {
                let mut ids: Vec<NodeId> = validators.keys().copied().collect();
                ids.sort_unstable();
                let mut rng = sampler.lock();
                ids.choose_multiple(&mut *rng, size).copied().collect()
            }
        }
    }

    /// All node IDs of a network, in arbitrary order.
    pub fn validator_ids(&self, network: NetworkId) -> Vec<NodeId> {
        self.state
            .read()
            .validators
            .get(&network)
            .map(|validators| validators.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Total weight of the given nodes within a network.
    ///
    /// Nodes that are not members are ignored; an unknown network weighs zero.
    pub fn subset_weight(
        &self,
        network: NetworkId,
        nodes: &HashSet<NodeId>,
    ) -> Result<u64, WeightOverflow> {
        let state = self.state.read();
        let Some(validators) = state.validators.get(&network) else {
            return Ok(0);
        };
        sum_weights(
            nodes
                .iter()
                .filter_map(|node| validators.get(node).map(|r| r.light)),
        )
    }

    /// Copy of a network's records.
    ///
    /// Mutating the returned map never affects the registry.
    pub fn get_map(&self, network: NetworkId) -> HashMap<NodeId, ValidatorRecord> {
        self.state
            .read()
            .validators
            .get(&network)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ValidatorRegistry")
            .field("networks", &state.validators.len())
            .field("listeners", &state.listeners.len())
            .field("config", &self.config)
            .finish()
    }
}
