//! Change notification for validator registries.
//!
//! Listeners are invoked synchronously while the registry holds its write
//! lock, in the order mutations are applied. A listener must not call back
//! into the registry that notifies it: the lock is not reentrant and doing so
//! deadlocks.

use warpset_types::{NetworkId, NodeId};

/// Observes membership changes across every network of a registry.
pub trait ManagerListener: Send + Sync {
    /// A validator was added (or re-staked) with the given weight.
    fn on_validator_added(&self, network: NetworkId, node: NodeId, light: u64);

    /// A validator's weight reached zero and its record was deleted.
    fn on_validator_removed(&self, network: NetworkId, node: NodeId, light: u64);

    /// A validator's weight changed without removing it.
    fn on_validator_light_changed(
        &self,
        network: NetworkId,
        node: NodeId,
        old_light: u64,
        new_light: u64,
    );
}

/// Observes membership changes of a single network.
pub trait SetListener: Send + Sync {
    /// A validator was added (or re-staked) with the given weight.
    fn on_validator_added(&self, node: NodeId, light: u64);

    /// A validator's weight reached zero and its record was deleted.
    fn on_validator_removed(&self, node: NodeId, light: u64);

    /// A validator's weight changed without removing it.
    fn on_validator_light_changed(&self, node: NodeId, old_light: u64, new_light: u64);
}
