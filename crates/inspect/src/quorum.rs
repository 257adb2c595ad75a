//! Quorum thresholds.

use anyhow::{bail, Context};
use std::fmt;
use std::str::FromStr;

/// A fractional threshold `numerator / denominator` of the total weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumThreshold {
    pub numerator: u64,
    pub denominator: u64,
}

impl QuorumThreshold {
    /// Create a threshold.
    ///
    /// # Errors
    ///
    /// Fails when the denominator is zero or the fraction exceeds one.
    pub fn new(numerator: u64, denominator: u64) -> anyhow::Result<Self> {
        if denominator == 0 {
            bail!("Quorum denominator must be non-zero");
        }
        if numerator > denominator {
            bail!("Quorum {numerator}/{denominator} exceeds the total weight");
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Whether `signed` out of `total` meets the threshold.
    ///
    /// Compared in 128-bit arithmetic so no product can overflow.
    pub fn is_met(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            >= u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for QuorumThreshold {
    fn default() -> Self {
        Self {
            numerator: 67,
            denominator: 100,
        }
    }
}

impl fmt::Display for QuorumThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for QuorumThreshold {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .split_once('/')
            .with_context(|| format!("Expected NUM/DEN, got '{s}'"))?;
        let numerator = num
            .trim()
            .parse()
            .with_context(|| format!("Invalid quorum numerator '{num}'"))?;
        let denominator = den
            .trim()
            .parse()
            .with_context(|| format!("Invalid quorum denominator '{den}'"))?;
        Self::new(numerator, denominator)
    }
}
