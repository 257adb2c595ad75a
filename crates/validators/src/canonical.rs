//! Canonical validator sets for Warp signature aggregation.
//!
//! Every participant must derive the same signer-set encoding from the same
//! validator snapshot, so the canonical set is:
//!
//! - **Deduplicated by key**: node IDs sharing one BLS key collapse into a
//!   single entry whose weight is their sum.
//! - **Totally ordered**: entries are sorted by the uncompressed encoding of
//!   their public key, compared as unsigned bytes.
//! - **Weight-conserving**: `total_weight` counts every input validator,
//!   including those without a usable key.
//!
//! Validators with missing or malformed keys are skipped rather than failing
//! the build; they simply cannot sign. Weight overflow, in contrast, aborts
//! the build, since a wrapped total would corrupt quorum checks.

use crate::{CanonicalError, WeightedValidator};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};
use warpset_types::{
    add_weight, Bls12381PublicKey, NodeId, SignerBitfield, PUBLIC_KEY_UNCOMPRESSED_LEN,
};

/// A deduplicated validator keyed by its canonical public key encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalValidator {
    /// Decoded public key.
    pub public_key: Bls12381PublicKey,

    /// Uncompressed key bytes; the ordering key.
    pub public_key_bytes: [u8; PUBLIC_KEY_UNCOMPRESSED_LEN],

    /// Sum of the weights of every node registered under this key.
    pub weight: u64,

    /// Nodes registered under this key, sorted ascending.
    pub node_ids: Vec<NodeId>,
}

impl CanonicalValidator {
    /// Canonical ordering: unsigned lexicographic order of the uncompressed key.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.public_key_bytes.cmp(&other.public_key_bytes)
    }
}

/// Validators in canonical order plus the network's full weight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalValidatorSet {
    /// Key-bearing validators, sorted by [`CanonicalValidator::compare`].
    pub validators: Vec<CanonicalValidator>,

    /// Weight of every input validator, including those without a key.
    ///
    /// Always at least the sum of `validators[..].weight`.
    pub total_weight: u64,
}

impl CanonicalValidatorSet {
    /// Number of canonical validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check whether no validator has a usable key.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validators selected by `signers`; see [`filter_validators`](crate::filter_validators).
    pub fn filter(&self, signers: &SignerBitfield) -> Result<Vec<&CanonicalValidator>, CanonicalError> {
        crate::filter_validators(signers, &self.validators)
    }

    /// Position of the entry a node contributes to, if any.
    pub fn index_of(&self, node_id: &NodeId) -> Option<usize> {
        self.validators
            .iter()
            .position(|v| v.node_ids.binary_search(node_id).is_ok())
    }
}

/// Build the canonical set from a `node → validator` snapshot.
///
/// Accepts any `(node, validator)` iterator, typically a `&HashMap` or
/// `&BTreeMap`. A node ID that repeats is counted once, at its first
/// occurrence. For duplicate-free input the result does not depend on
/// iteration order.
///
/// # Errors
///
/// [`CanonicalError::WeightOverflow`] if the total weight or the merged
/// weight of any key exceeds `u64::MAX`. Nothing partial is returned.
pub fn flatten_validator_set<'a, V, I>(snapshot: I) -> Result<CanonicalValidatorSet, CanonicalError>
where
    V: WeightedValidator + 'a,
    I: IntoIterator<Item = (&'a NodeId, &'a V)>,
{
    let mut by_key: HashMap<[u8; PUBLIC_KEY_UNCOMPRESSED_LEN], CanonicalValidator> =
        HashMap::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut total_weight = 0u64;

    for (node_id, vdr) in snapshot {
        if !seen.insert(*node_id) {
            debug!(node = %node_id, "Skipping repeated node ID");
            continue;
        }
        total_weight = add_weight(total_weight, vdr.weight())?;

        let pk_bytes = vdr.public_key_bytes();
        if pk_bytes.is_empty() {
            continue;
        }

        let public_key = match Bls12381PublicKey::from_compressed_bytes(pk_bytes) {
            Ok(pk) => pk,
            Err(e) => {
                trace!(node = %node_id, error = %e, "Skipping validator with invalid public key");
                continue;
            }
        };

        let canonical_bytes = public_key.to_uncompressed_bytes();
        match by_key.get_mut(&canonical_bytes) {
            Some(existing) => {
                existing.weight = add_weight(existing.weight, vdr.weight())?;
                existing.node_ids.push(*node_id);
                debug!(
                    node = %node_id,
                    merged_weight = existing.weight,
                    nodes = existing.node_ids.len(),
                    "Merged validator sharing a public key"
                );
            }
            None => {
                by_key.insert(
                    canonical_bytes,
                    CanonicalValidator {
                        public_key,
                        public_key_bytes: canonical_bytes,
                        weight: vdr.weight(),
                        node_ids: vec![*node_id],
                    },
                );
            }
        }
    }

    let mut validators: Vec<CanonicalValidator> = by_key.into_values().collect();
    for vdr in &mut validators {
        vdr.node_ids.sort_unstable();
    }
    validators.sort_unstable_by(CanonicalValidator::compare);

    Ok(CanonicalValidatorSet {
        validators,
        total_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidatorRecord;
    use std::collections::BTreeMap;
    use tracing_test::traced_test;
    use warpset_types::{Bls12381PrivateKey, TxId, WeightOverflow};

    fn key(seed: u8) -> Vec<u8> {
        Bls12381PrivateKey::from_seed(&[seed; 32])
            .public_key()
            .to_compressed_bytes()
            .to_vec()
    }

    fn snapshot(entries: &[(u8, Vec<u8>, u64)]) -> HashMap<NodeId, ValidatorRecord> {
        entries
            .iter()
            .map(|(n, pk, w)| {
                let node_id = NodeId([*n; 20]);
                (node_id, ValidatorRecord::new(node_id, pk.clone(), TxId::EMPTY, *w))
            })
            .collect()
    }

    fn canonical_with_bytes(bytes: &[u8]) -> CanonicalValidator {
        let public_key = Bls12381PrivateKey::from_seed(&[1; 32]).public_key();
        let mut public_key_bytes = [0u8; PUBLIC_KEY_UNCOMPRESSED_LEN];
        public_key_bytes[..bytes.len()].copy_from_slice(bytes);
        CanonicalValidator {
            public_key,
            public_key_bytes,
            weight: 0,
            node_ids: vec![],
        }
    }

    #[test]
    fn test_compare() {
        let v1 = canonical_with_bytes(&[0x01, 0x02, 0x03]);
        let v2 = canonical_with_bytes(&[0x01, 0x02, 0x04]);
        let v3 = canonical_with_bytes(&[0x01, 0x02, 0x03]);
        let v4 = canonical_with_bytes(&[0x80]);

        assert_eq!(v1.compare(&v2), Ordering::Less);
        assert_eq!(v2.compare(&v1), Ordering::Greater);
        assert_eq!(v1.compare(&v3), Ordering::Equal);
        // Unsigned comparison: 0x80 sorts after 0x01.
        assert_eq!(v4.compare(&v1), Ordering::Greater);
    }

    #[test]
    fn test_empty_input() {
        let set = flatten_validator_set(&HashMap::<NodeId, ValidatorRecord>::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total_weight, 0);
    }

    #[test]
    fn test_missing_key_counts_weight_only() {
        let set = flatten_validator_set(&snapshot(&[(1, vec![], 100)])).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total_weight, 100);
    }

    #[test]
    fn test_invalid_key_is_skipped() {
        let set = flatten_validator_set(&snapshot(&[
            (1, b"invalid-key".to_vec(), 100),
            (2, vec![0xff; 48], 10),
            (3, key(3), 5),
        ]))
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.total_weight, 115);
        assert_eq!(set.validators[0].weight, 5);
    }

    #[test]
    fn test_valid_key() {
        let set = flatten_validator_set(&snapshot(&[(1, key(1), 100)])).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.total_weight, 100);
        assert_eq!(set.validators[0].weight, 100);
        assert_eq!(set.validators[0].node_ids, vec![NodeId([1; 20])]);
        assert_eq!(
            set.validators[0].public_key_bytes,
            set.validators[0].public_key.to_uncompressed_bytes()
        );
    }

    #[test]
    fn test_duplicate_key_merges() {
        let set =
            flatten_validator_set(&snapshot(&[(1, key(7), 100), (2, key(7), 200), (3, key(8), 1)]))
                .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_weight, 301);

        let merged = &set.validators[set.index_of(&NodeId([1; 20])).unwrap()];
        assert_eq!(merged.weight, 300);
        assert_eq!(merged.node_ids, vec![NodeId([1; 20]), NodeId([2; 20])]);
        assert_eq!(set.index_of(&NodeId([2; 20])), set.index_of(&NodeId([1; 20])));
        assert_eq!(set.index_of(&NodeId([9; 20])), None);
    }

    #[test]
    fn test_repeated_node_id_counts_once() {
        let node = NodeId([1; 20]);
        let record = ValidatorRecord::new(node, key(7), TxId::EMPTY, 100);
        let other = ValidatorRecord::new(NodeId([2; 20]), key(7), TxId::EMPTY, 50);
        let entries = [(node, record.clone()), (other.node_id, other), (node, record)];

        let set = flatten_validator_set(entries.iter().map(|(n, r)| (n, r))).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.total_weight, 150);
        assert_eq!(set.validators[0].weight, 150);
        assert_eq!(set.validators[0].node_ids, vec![node, NodeId([2; 20])]);
    }

    #[test]
    fn test_sorted_by_uncompressed_key() {
        let entries: Vec<_> = (1..=10u8).map(|i| (i, key(i), u64::from(i))).collect();
        let set = flatten_validator_set(&snapshot(&entries)).unwrap();
        assert_eq!(set.len(), 10);
        for pair in set.validators.windows(2) {
            assert!(pair[0].public_key_bytes < pair[1].public_key_bytes);
        }
    }

    #[test]
    fn test_total_overflow() {
        let err = flatten_validator_set(&snapshot(&[(1, vec![], u64::MAX), (2, vec![], 1)]))
            .unwrap_err();
        assert!(matches!(err, CanonicalError::WeightOverflow(_)));
    }

    #[test]
    fn test_duplicate_key_overflow() {
        let mut input = BTreeMap::new();
        let (a, b) = (NodeId([1; 20]), NodeId([2; 20]));
        input.insert(a, ValidatorRecord::new(a, key(4), TxId::EMPTY, u64::MAX - 1));
        input.insert(b, ValidatorRecord::new(b, key(4), TxId::EMPTY, 1));
        let set = flatten_validator_set(&input).unwrap();
        assert_eq!(set.validators[0].weight, u64::MAX);
        assert_eq!(set.total_weight, u64::MAX);

        input.get_mut(&b).unwrap().light = 2;
        assert_eq!(
            flatten_validator_set(&input).unwrap_err(),
            CanonicalError::WeightOverflow(WeightOverflow {
                lhs: u64::MAX - 1,
                rhs: 2
            })
        );
    }

    #[test]
    fn test_boundary_sum_succeeds() {
        let set = flatten_validator_set(&snapshot(&[(1, vec![], u64::MAX - 1), (2, key(2), 1)]))
            .unwrap();
        assert_eq!(set.total_weight, u64::MAX);
        assert_eq!(set.len(), 1);
    }

    #[test]
    #[traced_test]
    fn test_skip_and_merge_are_logged() {
        flatten_validator_set(&snapshot(&[
            (1, b"bad".to_vec(), 1),
            (2, key(5), 1),
            (3, key(5), 1),
        ]))
        .unwrap();

        assert!(logs_contain("Skipping validator with invalid public key"));
        assert!(logs_contain("Merged validator sharing a public key"));
    }
}
