//! Fixed-answer calculators.

use crate::{Calculator, UptimeError};
use std::time::{Duration, SystemTime};
use warpset_types::{NetworkId, NodeId};

/// Reports every validator as fully online without tracking anything.
///
/// `calculate_uptime` returns `(0, 0)`; the percentages are `1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCalculator;

impl Calculator for NoOpCalculator {
    fn calculate_uptime(&self, _: NodeId, _: NetworkId) -> Result<(Duration, Duration), UptimeError> {
        Ok((Duration::ZERO, Duration::ZERO))
    }

    fn calculate_uptime_percent(&self, _: NodeId, _: NetworkId) -> Result<f64, UptimeError> {
        Ok(1.0)
    }

    fn calculate_uptime_percent_from(
        &self,
        _: NodeId,
        _: NetworkId,
        _: SystemTime,
    ) -> Result<f64, UptimeError> {
        Ok(1.0)
    }
}

/// Reports every validator as never online.
///
/// `calculate_uptime` returns zero out of one nanosecond so the ratio is a
/// well-defined `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroUptimeCalculator;

impl Calculator for ZeroUptimeCalculator {
    fn calculate_uptime(&self, _: NodeId, _: NetworkId) -> Result<(Duration, Duration), UptimeError> {
        Ok((Duration::ZERO, Duration::from_nanos(1)))
    }

    fn calculate_uptime_percent(&self, _: NodeId, _: NetworkId) -> Result<f64, UptimeError> {
        Ok(0.0)
    }

    fn calculate_uptime_percent_from(
        &self,
        _: NodeId,
        _: NetworkId,
        _: SystemTime,
    ) -> Result<f64, UptimeError> {
        Ok(0.0)
    }
}
