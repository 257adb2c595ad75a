//! Test helpers for warpset - provides real BLS committees and validator-state doubles.
//!
//! This crate provides utilities for creating validator snapshots backed by
//! real BLS keys, so tests exercise canonicalisation, signer selection and
//! aggregate verification end to end instead of stubbing the crypto.
//!
//! # Example
//!
//! ```rust
//! use warpset_test_helpers::{TestCommittee, fixtures};
//! use warpset_types::NetworkId;
//! use warpset_validators::{aggregate_public_keys, flatten_validator_set};
//!
//! // Four validators with deterministic keys and weight 100 each
//! let committee = TestCommittee::new(4, 42);
//! let set = flatten_validator_set(&committee.records()).unwrap();
//!
//! // Three of them sign a Warp payload
//! let signed = fixtures::make_signed_warp_message(
//!     &committee,
//!     &set,
//!     NetworkId::PRIMARY,
//!     b"payload",
//!     &[0, 1, 2],
//! );
//!
//! let signers = set.filter(&signed.signers).unwrap();
//! let pk = aggregate_public_keys(signers).unwrap();
//! assert!(signed.signature.verify(&signed.message, &pk));
//! ```

pub mod fixtures;
pub mod listener;
pub mod state;

pub use listener::{ListenerEvent, RecordingListener};
pub use state::TestState;

use std::collections::HashMap;
use warpset_types::{Bls12381PrivateKey, Bls12381PublicKey, NetworkId, NodeId, TxId};
use warpset_validators::{ValidatorRecord, ValidatorRegistry};

/// Default weight given to every committee member.
pub const DEFAULT_WEIGHT: u64 = 100;

/// A test committee of validators with deterministic BLS keypairs.
///
/// Member `i` has node ID, keypair and weight at index `i`. Node IDs are
/// derived from the member's original key, so they stay distinct even after
/// [`share_key`](Self::share_key) makes two members use the same key.
pub struct TestCommittee {
    keypairs: Vec<Bls12381PrivateKey>,
    public_keys: Vec<Bls12381PublicKey>,
    node_ids: Vec<NodeId>,
    weights: Vec<u64>,
}

impl std::fmt::Debug for TestCommittee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCommittee")
            .field("size", &self.keypairs.len())
            .field("node_ids", &self.node_ids)
            .field("weights", &self.weights)
            .finish()
    }
}

impl TestCommittee {
    /// Create a new test committee with the given size and seed.
    ///
    /// The seed ensures deterministic key generation for reproducible tests.
    /// Different seeds produce different committees.
    ///
    /// ```rust
    /// use warpset_test_helpers::TestCommittee;
    ///
    /// let committee = TestCommittee::new(4, 42);
    /// assert_eq!(committee.size(), 4);
    /// ```
    pub fn new(size: usize, seed: u64) -> Self {
        let mut keypairs = Vec::with_capacity(size);
        let mut public_keys = Vec::with_capacity(size);
        let mut node_ids = Vec::with_capacity(size);

        for i in 0..size {
            let mut seed_bytes = [0u8; 32];
            let key_seed = seed.wrapping_add(i as u64).wrapping_mul(0x517cc1b727220a95);
            seed_bytes[..8].copy_from_slice(&key_seed.to_le_bytes());
            seed_bytes[8..16].copy_from_slice(&(i as u64).to_le_bytes());
            seed_bytes[16..24].copy_from_slice(&seed.to_le_bytes());

            let kp = Bls12381PrivateKey::from_seed(&seed_bytes);
            let pk = kp.public_key();

            let mut node_bytes = [0u8; NodeId::BYTES];
            node_bytes.copy_from_slice(&pk.to_compressed_bytes()[..NodeId::BYTES]);

            keypairs.push(kp);
            public_keys.push(pk);
            node_ids.push(NodeId(node_bytes));
        }

        Self {
            keypairs,
            public_keys,
            node_ids,
            weights: vec![DEFAULT_WEIGHT; size],
        }
    }

    /// Replace every member's weight.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len() != size()`.
    pub fn with_weights(mut self, weights: Vec<u64>) -> Self {
        assert_eq!(weights.len(), self.size(), "one weight per member");
        self.weights = weights;
        self
    }

    /// Make member `to` register under member `from`'s key.
    ///
    /// Both members then collapse into one canonical entry.
    pub fn share_key(mut self, from: usize, to: usize) -> Self {
        self.keypairs[to] = self.keypairs[from].clone();
        self.public_keys[to] = self.public_keys[from].clone();
        self
    }

    /// Get the number of validators in the committee.
    pub fn size(&self) -> usize {
        self.keypairs.len()
    }

    /// Get a keypair by index.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= size()`.
    pub fn keypair(&self, idx: usize) -> &Bls12381PrivateKey {
        &self.keypairs[idx]
    }

    /// Get a public key by index.
    pub fn public_key(&self, idx: usize) -> &Bls12381PublicKey {
        &self.public_keys[idx]
    }

    /// Compressed key bytes, as stored in a [`ValidatorRecord`].
    pub fn public_key_bytes(&self, idx: usize) -> Vec<u8> {
        self.public_keys[idx].to_compressed_bytes().to_vec()
    }

    /// Get a node ID by index.
    pub fn node_id(&self, idx: usize) -> NodeId {
        self.node_ids[idx]
    }

    /// Get a member's weight by index.
    pub fn weight(&self, idx: usize) -> u64 {
        self.weights[idx]
    }

    /// Get all node IDs.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Sum of all member weights.
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Registry record for member `idx`.
    pub fn record(&self, idx: usize) -> ValidatorRecord {
        ValidatorRecord::new(
            self.node_ids[idx],
            self.public_key_bytes(idx),
            TxId::EMPTY,
            self.weights[idx],
        )
    }

    /// The committee as a `node → record` snapshot.
    pub fn records(&self) -> HashMap<NodeId, ValidatorRecord> {
        (0..self.size())
            .map(|i| (self.node_ids[i], self.record(i)))
            .collect()
    }

    /// Stake every member into `registry` on `network`.
    pub fn register(&self, registry: &ValidatorRegistry, network: NetworkId) {
        for i in 0..self.size() {
            registry.add_record(network, self.record(i));
        }
    }

    /// A registry holding this committee on `network`.
    pub fn to_registry(&self, network: NetworkId) -> ValidatorRegistry {
        let registry = ValidatorRegistry::new();
        self.register(&registry, network);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpset_validators::flatten_validator_set;

    #[test]
    fn test_committee_creation() {
        let committee = TestCommittee::new(4, 42);

        assert_eq!(committee.size(), 4);
        assert_eq!(committee.total_weight(), 400);
        assert_eq!(committee.records().len(), 4);
    }

    #[test]
    fn test_committee_deterministic() {
        let c1 = TestCommittee::new(4, 42);
        let c2 = TestCommittee::new(4, 42);

        for i in 0..4 {
            assert_eq!(c1.public_key(i), c2.public_key(i));
            assert_eq!(c1.node_id(i), c2.node_id(i));
        }
    }

    #[test]
    fn test_committee_different_seeds() {
        let c1 = TestCommittee::new(4, 42);
        let c2 = TestCommittee::new(4, 43);

        assert_ne!(c1.public_key(0), c2.public_key(0));
    }

    #[test]
    fn test_shared_key_keeps_node_ids() {
        let committee = TestCommittee::new(3, 7).share_key(0, 2);

        assert_eq!(committee.public_key(0), committee.public_key(2));
        assert_ne!(committee.node_id(0), committee.node_id(2));

        let set = flatten_validator_set(&committee.records()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_weight, 300);
    }

    #[test]
    fn test_register() {
        let net = NetworkId([5; 32]);
        let committee = TestCommittee::new(5, 1).with_weights(vec![1, 2, 3, 4, 5]);
        let registry = committee.to_registry(net);

        assert_eq!(registry.count(net), 5);
        assert_eq!(registry.total_light(net), Ok(15));
        assert_eq!(registry.get_light(net, committee.node_id(3)), 4);
    }

    #[test]
    fn test_keypair_signing() {
        let committee = TestCommittee::new(4, 42);

        let message = b"test message";
        let signature = committee.keypair(0).sign(message);

        assert!(signature.verify(message, committee.public_key(0)));
        assert!(!signature.verify(message, committee.public_key(1)));
    }
}
