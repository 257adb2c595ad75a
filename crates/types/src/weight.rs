//! Overflow-checked weight arithmetic.
//!
//! Validator weights are summed when computing network totals, merging
//! validators that share a key, and weighing signer subsets against a quorum
//! threshold. A wrapped total would silently corrupt the threshold check, so
//! every addition goes through [`add_weight`] and overflow is a hard error.

/// Adding two weights exceeded `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("weight overflowed: {lhs} + {rhs} > u64::MAX")]
pub struct WeightOverflow {
    /// Accumulated weight before the failing addition.
    pub lhs: u64,
    /// Weight being added.
    pub rhs: u64,
}

/// Add two weights, failing on overflow.
pub fn add_weight(lhs: u64, rhs: u64) -> Result<u64, WeightOverflow> {
    lhs.checked_add(rhs).ok_or(WeightOverflow { lhs, rhs })
}

/// Sum a sequence of weights, failing on the first overflow.
///
/// An empty sequence sums to zero.
pub fn sum_weights<I>(weights: I) -> Result<u64, WeightOverflow>
where
    I: IntoIterator<Item = u64>,
{
    weights.into_iter().try_fold(0u64, add_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_at_boundary() {
        assert_eq!(add_weight(u64::MAX - 1, 1), Ok(u64::MAX));
        assert_eq!(
            add_weight(u64::MAX, 1),
            Err(WeightOverflow {
                lhs: u64::MAX,
                rhs: 1
            })
        );
    }

    #[test]
    fn test_sum_weights() {
        assert_eq!(sum_weights(Vec::<u64>::new()), Ok(0));
        assert_eq!(sum_weights([1, 2, 3]), Ok(6));
        assert!(sum_weights([u64::MAX, 0, 1]).is_err());
    }
}
