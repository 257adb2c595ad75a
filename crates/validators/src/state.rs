//! Validator-state providers.
//!
//! A [`ValidatorState`] answers "who validated network N at height H". The
//! canonical set pipeline only needs [`ValidatorState::validator_set`]; the
//! remaining methods have defaults suited to single-chain, height-agnostic
//! providers such as [`ValidatorRegistry`].

use crate::{
    flatten_validator_set, CanonicalValidatorSet, ValidatorRecord, ValidatorRegistry,
    WarpSetError, WeightedValidator,
};
use std::collections::HashMap;
use tracing::trace;
use warpset_types::{NetworkId, NodeId};

/// Errors returned by validator-state providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The provider does not track this network.
    #[error("unknown network {0}")]
    UnknownNetwork(NetworkId),

    /// No network is bound to this chain.
    #[error("unknown chain {0}")]
    UnknownChain(NetworkId),

    /// The requested height has been pruned or is not yet known.
    #[error("height {height} unavailable (minimum {minimum})")]
    HeightUnavailable {
        /// Requested height.
        height: u64,
        /// Lowest height the provider can serve.
        minimum: u64,
    },

    /// Any other provider failure.
    #[error("provider error: {0}")]
    Provider(String),
}

/// A validator eligible to sign Warp messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpValidator {
    /// Node identifier.
    pub node_id: NodeId,
    /// Compressed BLS public key.
    pub public_key: Vec<u8>,
    /// Ringtail public key; empty when absent.
    pub ringtail_public_key: Vec<u8>,
    /// Staking weight.
    pub weight: u64,
}

impl From<&ValidatorRecord> for WarpValidator {
    fn from(record: &ValidatorRecord) -> Self {
        Self {
            node_id: record.node_id,
            public_key: record.public_key.clone(),
            ringtail_public_key: record.ringtail_public_key.clone(),
            weight: record.light,
        }
    }
}

impl WeightedValidator for WarpValidator {
    fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }

    fn weight(&self) -> u64 {
        self.weight
    }
}

/// Warp-capable validators of one network at one height.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WarpSet {
    /// Height the set was taken at.
    pub height: u64,
    /// Validators holding a BLS key, keyed by node.
    pub validators: HashMap<NodeId, WarpValidator>,
}

impl WarpSet {
    /// Keep the key-bearing records of a snapshot.
    pub fn from_records<'a, I>(height: u64, records: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidatorRecord>,
    {
        let validators = records
            .into_iter()
            .filter(|r| !r.public_key.is_empty())
            .map(|r| (r.node_id, WarpValidator::from(r)))
            .collect();
        Self { height, validators }
    }
}

/// Source of validator snapshots by height and network.
pub trait ValidatorState: Send + Sync {
    /// Validators of `network` at `height`.
    fn validator_set(
        &self,
        height: u64,
        network: NetworkId,
    ) -> Result<HashMap<NodeId, ValidatorRecord>, StateError>;

    /// Tip height of the provider.
    fn current_height(&self) -> Result<u64, StateError>;

    /// Current validators of `network`.
    fn current_validators(
        &self,
        height: u64,
        network: NetworkId,
    ) -> Result<HashMap<NodeId, ValidatorRecord>, StateError> {
        self.validator_set(height, network)
    }

    /// Lowest height the provider can serve.
    fn minimum_height(&self) -> Result<u64, StateError> {
        Ok(0)
    }

    /// Chain bound to `network`. Identity by default.
    fn chain_id(&self, network: NetworkId) -> Result<NetworkId, StateError> {
        Ok(network)
    }

    /// Network bound to `chain`. Identity by default.
    fn network_id(&self, chain: NetworkId) -> Result<NetworkId, StateError> {
        Ok(chain)
    }

    /// Warp-capable validators of `network` at `height`.
    fn warp_validator_set(&self, height: u64, network: NetworkId) -> Result<WarpSet, StateError> {
        let records = self.validator_set(height, network)?;
        Ok(WarpSet::from_records(height, records.values()))
    }

    /// Warp sets for every `(network, height)` pair, keyed network first.
    fn warp_validator_sets(
        &self,
        heights: &[u64],
        networks: &[NetworkId],
    ) -> Result<HashMap<NetworkId, HashMap<u64, WarpSet>>, StateError> {
        let mut result: HashMap<NetworkId, HashMap<u64, WarpSet>> = HashMap::new();
        for &network in networks {
            let per_height = result.entry(network).or_default();
            for &height in heights {
                per_height.insert(height, self.warp_validator_set(height, network)?);
            }
        }
        Ok(result)
    }
}

/// The registry tracks only the current membership: every height resolves
/// to it and unknown networks are empty rather than errors.
impl ValidatorState for ValidatorRegistry {
    fn validator_set(
        &self,
        _height: u64,
        network: NetworkId,
    ) -> Result<HashMap<NodeId, ValidatorRecord>, StateError> {
        Ok(self.get_map(network))
    }

    fn current_height(&self) -> Result<u64, StateError> {
        Ok(0)
    }
}

/// Fetch the snapshot of `network` at `height` and canonicalise it.
///
/// Uses the full snapshot, so `total_weight` includes validators without a
/// BLS key.
pub fn canonical_validator_set<S>(
    state: &S,
    height: u64,
    network: NetworkId,
) -> Result<CanonicalValidatorSet, WarpSetError>
where
    S: ValidatorState + ?Sized,
{
    let snapshot = state.validator_set(height, network)?;
    let set = flatten_validator_set(&snapshot)?;
    trace!(
        network = %network,
        height,
        validators = set.len(),
        total_weight = set.total_weight,
        "Built canonical validator set"
    );
    Ok(set)
}
