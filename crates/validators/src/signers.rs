//! Signer selection, quorum weighing and key aggregation over canonical sets.

use crate::{CanonicalError, CanonicalValidator};
use warpset_types::{
    add_weight, AggregateError, Bls12381PublicKey, SignerBitfield, WeightOverflow,
};

/// Validators of `vdrs` whose bit is set in `signers`, in canonical order.
///
/// # Errors
///
/// [`CanonicalError::UnknownValidator`] if any set bit is at an index
/// `>= vdrs.len()`. The selector is never truncated.
pub fn filter_validators<'a>(
    signers: &SignerBitfield,
    vdrs: &'a [CanonicalValidator],
) -> Result<Vec<&'a CanonicalValidator>, CanonicalError> {
    let bit_len = signers.bit_len();
    if bit_len > vdrs.len() {
        return Err(CanonicalError::UnknownValidator {
            highest_index: bit_len - 1,
            num_validators: vdrs.len(),
        });
    }

    Ok(vdrs
        .iter()
        .enumerate()
        .filter(|(i, _)| signers.is_set(*i))
        .map(|(_, vdr)| vdr)
        .collect())
}

/// Total weight of the given validators; zero for none.
pub fn sum_weight<'a, I>(vdrs: I) -> Result<u64, WeightOverflow>
where
    I: IntoIterator<Item = &'a CanonicalValidator>,
{
    vdrs.into_iter()
        .try_fold(0u64, |acc, vdr| add_weight(acc, vdr.weight))
}

/// Aggregate public key of the given validators.
///
/// Keys are not re-validated: every [`CanonicalValidator`] already holds a
/// key that passed decoding during canonicalisation.
///
/// # Errors
///
/// [`AggregateError::Empty`] when no validator is given.
pub fn aggregate_public_keys<'a, I>(vdrs: I) -> Result<Bls12381PublicKey, AggregateError>
where
    I: IntoIterator<Item = &'a CanonicalValidator>,
{
    let pks: Vec<&Bls12381PublicKey> = vdrs.into_iter().map(|vdr| &vdr.public_key).collect();
    Bls12381PublicKey::aggregate(&pks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpset_types::{Bls12381PrivateKey, Bls12381Signature, NodeId};

    fn canonical(seeds: &[u8]) -> Vec<CanonicalValidator> {
        let mut vdrs: Vec<_> = seeds
            .iter()
            .map(|&seed| {
                let public_key = Bls12381PrivateKey::from_seed(&[seed; 32]).public_key();
                CanonicalValidator {
                    public_key_bytes: public_key.to_uncompressed_bytes(),
                    public_key,
                    weight: u64::from(seed) * 10,
                    node_ids: vec![NodeId([seed; 20])],
                }
            })
            .collect();
        vdrs.sort_by(CanonicalValidator::compare);
        vdrs
    }

    #[test]
    fn test_filter_preserves_canonical_order() {
        let vdrs = canonical(&[1, 2, 3, 4]);
        let signers = SignerBitfield::from_indices([3, 0, 2]);

        let selected = filter_validators(&signers, &vdrs).unwrap();
        assert_eq!(selected.len(), 3);
        assert!(std::ptr::eq(selected[0], &vdrs[0]));
        assert!(std::ptr::eq(selected[1], &vdrs[2]));
        assert!(std::ptr::eq(selected[2], &vdrs[3]));
    }

    #[test]
    fn test_filter_highest_bit_at_last_index() {
        let vdrs = canonical(&[1, 2, 3]);
        let selected = filter_validators(&SignerBitfield::from_indices([2]), &vdrs).unwrap();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_filter_bit_at_length_is_unknown() {
        let vdrs = canonical(&[1, 2, 3]);
        let err = filter_validators(&SignerBitfield::from_indices([0, 3]), &vdrs).unwrap_err();
        assert_eq!(
            err,
            CanonicalError::UnknownValidator {
                highest_index: 3,
                num_validators: 3
            }
        );
        assert_eq!(
            err.to_string(),
            "unknown validator: NumIndices (3) >= NumFilteredValidators (3)"
        );
    }

    #[test]
    fn test_filter_empty_selector() {
        let vdrs = canonical(&[1, 2]);
        assert!(filter_validators(&SignerBitfield::new(64), &vdrs)
            .unwrap()
            .is_empty());
        assert!(filter_validators(&SignerBitfield::empty(), &[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_filter_any_bit_against_empty_set() {
        assert!(filter_validators(&SignerBitfield::from_indices([0]), &[]).is_err());
    }

    #[test]
    fn test_sum_weight() {
        let vdrs = canonical(&[1, 2, 3]);
        assert_eq!(sum_weight(&vdrs), Ok(60));
        assert_eq!(sum_weight(&[] as &[CanonicalValidator]), Ok(0));
    }

    #[test]
    fn test_sum_weight_overflow() {
        let mut vdrs = canonical(&[1, 2]);
        vdrs[0].weight = u64::MAX;
        vdrs[1].weight = 1;
        assert!(sum_weight(&vdrs).is_err());

        vdrs[0].weight = u64::MAX - 1;
        assert_eq!(sum_weight(&vdrs), Ok(u64::MAX));
    }

    #[test]
    fn test_aggregate_verifies_multi_signature() {
        let message = b"warp";
        let seeds = [1u8, 2, 3];
        let vdrs = canonical(&seeds);

        let sigs: Vec<_> = seeds
            .iter()
            .map(|&s| Bls12381PrivateKey::from_seed(&[s; 32]).sign(message))
            .collect();
        let sig_refs: Vec<_> = sigs.iter().collect();
        let agg_sig = Bls12381Signature::aggregate(&sig_refs).unwrap();

        let agg_pk = aggregate_public_keys(&vdrs).unwrap();
        assert!(agg_sig.verify(message, &agg_pk));
    }

    #[test]
    fn test_aggregate_empty_is_error() {
        assert_eq!(
            aggregate_public_keys(&[] as &[CanonicalValidator]),
            Err(AggregateError::Empty)
        );
    }
}
