//! Fixture builders for snapshots and signed Warp messages.
//!
//! These functions create properly-signed test fixtures that exercise
//! real cryptographic verification paths.

use std::collections::{BTreeMap, HashMap};

use crate::TestCommittee;
use warpset_types::{
    warp_message, Bls12381Signature, NetworkId, NodeId, SignerBitfield, TxId,
};
use warpset_validators::{CanonicalValidatorSet, ValidatorRecord};

/// A Warp message signed by a subset of a canonical set.
#[derive(Debug, Clone)]
pub struct SignedWarpMessage {
    /// The signed bytes (domain-separated payload).
    pub message: Vec<u8>,
    /// Canonical positions of the signers.
    pub signers: SignerBitfield,
    /// Aggregate of one signature per signing canonical entry.
    pub signature: Bls12381Signature,
}

/// Sign `payload` with the committee members at `signer_indices`.
///
/// Members sharing a key map to one canonical entry and sign once for it,
/// matching how the aggregate key is computed on the verifying side.
///
/// # Panics
///
/// Panics if a signer has no entry in `set` or `signer_indices` is empty.
///
/// # Example
///
/// ```rust
/// use warpset_test_helpers::{TestCommittee, fixtures};
/// use warpset_types::NetworkId;
/// use warpset_validators::{flatten_validator_set, sum_weight};
///
/// let committee = TestCommittee::new(4, 42);
/// let set = flatten_validator_set(&committee.records()).unwrap();
/// let signed = fixtures::make_signed_warp_message(
///     &committee, &set, NetworkId::PRIMARY, b"hello", &[1, 3],
/// );
///
/// let signers = set.filter(&signed.signers).unwrap();
/// assert_eq!(sum_weight(signers), Ok(200));
/// ```
pub fn make_signed_warp_message(
    committee: &TestCommittee,
    set: &CanonicalValidatorSet,
    network: NetworkId,
    payload: &[u8],
    signer_indices: &[usize],
) -> SignedWarpMessage {
    let message = warp_message(&network, payload);

    // Canonical position → first committee member signing for it
    let mut by_position: BTreeMap<usize, usize> = BTreeMap::new();
    for &idx in signer_indices {
        let pos = set
            .index_of(&committee.node_id(idx))
            .expect("signer must have a canonical entry");
        by_position.entry(pos).or_insert(idx);
    }

    let signatures: Vec<Bls12381Signature> = by_position
        .values()
        .map(|&idx| committee.keypair(idx).sign(&message))
        .collect();
    let refs: Vec<&Bls12381Signature> = signatures.iter().collect();
    let signature = Bls12381Signature::aggregate(&refs).expect("BLS aggregation should succeed");

    SignedWarpMessage {
        message,
        signers: SignerBitfield::from_indices(by_position.keys().copied()),
        signature,
    }
}

/// Selector for the canonical entries that `nodes` contribute to.
///
/// # Panics
///
/// Panics if a node has no entry in `set`.
pub fn signers_for(set: &CanonicalValidatorSet, nodes: &[NodeId]) -> SignerBitfield {
    SignerBitfield::from_indices(nodes.iter().map(|node| {
        set.index_of(node)
            .expect("node must have a canonical entry")
    }))
}

/// Build a snapshot from `(node, compressed key, weight)` triples.
///
/// Later entries for the same node replace earlier ones.
pub fn make_snapshot(entries: &[(NodeId, Vec<u8>, u64)]) -> HashMap<NodeId, ValidatorRecord> {
    entries
        .iter()
        .map(|(node, key, weight)| {
            (
                *node,
                ValidatorRecord::new(*node, key.clone(), TxId::EMPTY, *weight),
            )
        })
        .collect()
}

/// Bytes of the right length that do not decode to a valid public key.
pub fn invalid_public_key() -> Vec<u8> {
    vec![0xff; warpset_types::PUBLIC_KEY_COMPRESSED_LEN]
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpset_validators::{aggregate_public_keys, flatten_validator_set};

    #[test]
    fn test_signed_message_verifies() {
        let committee = TestCommittee::new(5, 9);
        let set = flatten_validator_set(&committee.records()).unwrap();
        let signed = make_signed_warp_message(&committee, &set, NetworkId([2; 32]), b"x", &[0, 4]);

        assert_eq!(signed.signers.count_ones(), 2);
        let pk = aggregate_public_keys(set.filter(&signed.signers).unwrap()).unwrap();
        assert!(signed.signature.verify(&signed.message, &pk));
    }

    #[test]
    fn test_shared_key_signs_once() {
        let committee = TestCommittee::new(3, 9).share_key(0, 1);
        let set = flatten_validator_set(&committee.records()).unwrap();
        let signed =
            make_signed_warp_message(&committee, &set, NetworkId::PRIMARY, b"x", &[0, 1, 2]);

        assert_eq!(signed.signers.count_ones(), 2);
        let pk = aggregate_public_keys(set.filter(&signed.signers).unwrap()).unwrap();
        assert!(signed.signature.verify(&signed.message, &pk));
    }

    #[test]
    fn test_signers_for() {
        let committee = TestCommittee::new(4, 3);
        let set = flatten_validator_set(&committee.records()).unwrap();
        let signers = signers_for(&set, &[committee.node_id(2)]);

        let selected = set.filter(&signers).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].node_ids, vec![committee.node_id(2)]);
    }

    #[test]
    fn test_make_snapshot_and_invalid_key() {
        let node = NodeId([1; 20]);
        let snapshot = make_snapshot(&[(node, invalid_public_key(), 10)]);
        let set = flatten_validator_set(&snapshot).unwrap();

        assert!(set.is_empty());
        assert_eq!(set.total_weight, 10);
    }
}
