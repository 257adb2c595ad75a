//! Point-in-time validator set snapshots.

use warpset_types::{sum_weights, NodeId, WeightOverflow};

/// A validator's identity and weight within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorInfo {
    /// Node identifier.
    pub node_id: NodeId,

    /// Staking weight.
    pub light: u64,
}

/// An owned snapshot of one network's validators.
///
/// Detached from the registry: later mutations are not reflected here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatorSet {
    /// The validators, ordered by node ID.
    validators: Vec<ValidatorInfo>,
}

impl ValidatorSet {
    /// Create a new validator set.
    pub fn new(mut validators: Vec<ValidatorInfo>) -> Self {
        validators.sort_by_key(|v| v.node_id);
        Self { validators }
    }

    /// Get the number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Check whether a node is a member.
    pub fn has(&self, node_id: &NodeId) -> bool {
        self.get(node_id).is_some()
    }

    /// Find a validator by node ID.
    pub fn get(&self, node_id: &NodeId) -> Option<&ValidatorInfo> {
        self.validators
            .binary_search_by_key(node_id, |v| v.node_id)
            .ok()
            .map(|i| &self.validators[i])
    }

    /// All validators, ordered by node ID.
    pub fn list(&self) -> &[ValidatorInfo] {
        &self.validators
    }

    /// Total weight of the set.
    pub fn light(&self) -> Result<u64, WeightOverflow> {
        sum_weights(self.validators.iter().map(|v| v.light))
    }

    /// Up to `size` node IDs, in node ID order.
    pub fn sample(&self, size: usize) -> Vec<NodeId> {
        self.validators
            .iter()
            .take(size)
            .map(|v| v.node_id)
            .collect()
    }
}
