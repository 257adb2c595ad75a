//! Canonical set determinism.
//!
//! Two parties building a canonical set from the same snapshot must agree
//! on every position, whatever order they happen to iterate the snapshot in.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use warpset_test_helpers::fixtures::invalid_public_key;
use warpset_test_helpers::TestCommittee;
use warpset_types::{NodeId, SignerBitfield};
use warpset_validators::{
    filter_validators, flatten_validator_set, sum_weight, CanonicalValidatorSet, ValidatorRecord,
};

/// A snapshot mixing unique keys, shared keys, keyless and malformed keys.
fn mixed_snapshot() -> Vec<(NodeId, ValidatorRecord)> {
    let committee = TestCommittee::new(16, 7)
        .with_weights((1..=16).collect())
        .share_key(0, 5)
        .share_key(0, 9)
        .share_key(3, 12);

    let mut records: Vec<_> = committee.records().into_iter().collect();
    records.sort_by_key(|(node, _)| *node);
    for (i, (_, record)) in records.iter_mut().enumerate() {
        match i % 7 {
            1 => record.public_key.clear(),
            4 => record.public_key = invalid_public_key(),
            _ => {}
        }
    }
    records
}

fn build(entries: &[(NodeId, ValidatorRecord)]) -> CanonicalValidatorSet {
    flatten_validator_set(entries.iter().map(|(node, record)| (node, record))).unwrap()
}

#[test]
fn test_same_set_across_permutations() {
    let base = mixed_snapshot();
    let expected = build(&base);
    assert!(!expected.is_empty());

    for seed in 0..32u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut shuffled = base.clone();
        shuffled.shuffle(&mut rng);

        assert_eq!(build(&shuffled), expected, "seed {seed} diverged");
    }
}

#[test]
fn test_same_set_from_hash_map() {
    let base = mixed_snapshot();
    let expected = build(&base);

    // Each HashMap has its own hasher state and therefore its own order.
    for _ in 0..8 {
        let map: HashMap<NodeId, ValidatorRecord> = base.iter().cloned().collect();
        assert_eq!(flatten_validator_set(&map).unwrap(), expected);
    }
}

#[test]
fn test_total_weight_counts_every_input() {
    let base = mixed_snapshot();
    let set = build(&base);

    let input_total: u64 = base.iter().map(|(_, r)| r.light).sum();
    assert_eq!(set.total_weight, input_total);
    assert!(sum_weight(&set.validators).unwrap() <= set.total_weight);
}

#[test]
fn test_positions_agree_across_permutations() {
    let base = mixed_snapshot();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut shuffled = base.clone();
    shuffled.shuffle(&mut rng);

    let a = build(&base);
    let b = build(&shuffled);

    let signers = SignerBitfield::from_indices((0..a.len()).step_by(2));
    let selected_a: Vec<_> = filter_validators(&signers, &a.validators).unwrap();
    let selected_b: Vec<_> = filter_validators(&signers, &b.validators).unwrap();
    assert_eq!(selected_a, selected_b);
    assert_eq!(sum_weight(selected_a), sum_weight(selected_b));
}

#[test]
fn test_each_node_in_at_most_one_entry() {
    let set = build(&mixed_snapshot());

    let mut seen = std::collections::HashSet::new();
    for vdr in &set.validators {
        assert!(!vdr.node_ids.is_empty());
        for node in &vdr.node_ids {
            assert!(seen.insert(*node), "node {node} appears twice");
        }
    }
}
