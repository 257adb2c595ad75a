//! Errors surfaced by the canonical set pipeline.

use crate::StateError;
use warpset_types::WeightOverflow;

/// Failures of canonicalisation, signer selection and quorum weighing.
///
/// Both variants reject the whole request: no partial set or sum is ever
/// returned alongside them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonicalError {
    /// Accumulated weight exceeded `u64::MAX`.
    #[error(transparent)]
    WeightOverflow(#[from] WeightOverflow),

    /// The signer selector references a position past the canonical set.
    #[error(
        "unknown validator: NumIndices ({highest_index}) >= NumFilteredValidators ({num_validators})"
    )]
    UnknownValidator {
        /// Highest index set in the selector.
        highest_index: usize,
        /// Length of the canonical validator sequence.
        num_validators: usize,
    },
}

/// Failure fetching and canonicalising a validator set from a state provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WarpSetError {
    /// The provider could not supply the snapshot.
    #[error("validator state: {0}")]
    State(#[from] StateError),

    /// The snapshot could not be canonicalised.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
}
