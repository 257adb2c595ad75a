//! Signer selection reports.

use crate::QuorumThreshold;
use std::fmt;
use warpset_types::{Bls12381PublicKey, SignerBitfield};
use warpset_validators::{
    aggregate_public_keys, sum_weight, CanonicalError, CanonicalValidatorSet,
};

/// Outcome of applying a signer selector to a canonical set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Canonical positions selected.
    pub indices: Vec<usize>,
    /// Combined weight of the selected entries.
    pub signed_weight: u64,
    /// Weight of the whole network.
    pub total_weight: u64,
    /// Aggregate key of the selected entries; `None` when nothing is selected.
    pub aggregate_key: Option<Bls12381PublicKey>,
    /// Whether `signed_weight` meets the threshold.
    pub quorum_met: bool,
}

/// Apply `signers` to `set` and weigh the result against `threshold`.
pub fn select(
    set: &CanonicalValidatorSet,
    signers: &SignerBitfield,
    threshold: QuorumThreshold,
) -> Result<Selection, CanonicalError> {
    let selected = set.filter(signers)?;
    let signed_weight = sum_weight(selected.iter().copied())?;
    let aggregate_key = aggregate_public_keys(selected.iter().copied()).ok();

    Ok(Selection {
        indices: signers.set_indices().collect(),
        signed_weight,
        total_weight: set.total_weight,
        aggregate_key,
        quorum_met: threshold.is_met(signed_weight, set.total_weight),
    })
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "signers:        {:?}", self.indices)?;
        writeln!(f, "signed weight:  {}", self.signed_weight)?;
        writeln!(f, "total weight:   {}", self.total_weight)?;
        match &self.aggregate_key {
            Some(pk) => writeln!(f, "aggregate key:  {}", hex::encode(pk.to_compressed_bytes()))?,
            None => writeln!(f, "aggregate key:  -")?,
        }
        write!(f, "quorum met:     {}", self.quorum_met)
    }
}
