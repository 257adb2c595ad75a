//! Validator uptime calculation for warpset.
//!
//! - **Calculator**: the uptime query interface, keyed by node and network
//! - **NoOp / ZeroUptime**: fixed-answer calculators for networks without
//!   uptime tracking
//! - **LockedCalculator**: a thread-safe per-network table of calculators
//!   with a fallback
//! - **UptimeState**: persisted uptime records a calculator can be built on

mod locked;
mod noop;
mod state;

pub use locked::LockedCalculator;
pub use noop::{NoOpCalculator, ZeroUptimeCalculator};
pub use state::{MemoryUptimeState, UptimeState};

use std::time::{Duration, SystemTime};
use warpset_types::{NetworkId, NodeId};

/// Errors from uptime queries and uptime state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UptimeError {
    /// No uptime is tracked for this validator on this network.
    #[error("no uptime tracked for {node} on {network}")]
    NotTracked { node: NodeId, network: NetworkId },

    /// The validator is already tracked on this network.
    #[error("uptime already tracked for {node} on {network}")]
    AlreadyTracked { node: NodeId, network: NetworkId },

    /// Any other calculator failure.
    #[error("uptime calculator: {0}")]
    Calculator(String),
}

/// Computes how long validators have been online.
pub trait Calculator: Send + Sync {
    /// `(uptime, total)` of `node` on `network`.
    fn calculate_uptime(
        &self,
        node: NodeId,
        network: NetworkId,
    ) -> Result<(Duration, Duration), UptimeError>;

    /// Uptime as a fraction in `[0.0, 1.0]`.
    fn calculate_uptime_percent(&self, node: NodeId, network: NetworkId) -> Result<f64, UptimeError>;

    /// Uptime as a fraction, counted from `from`.
    fn calculate_uptime_percent_from(
        &self,
        node: NodeId,
        network: NetworkId,
        from: SystemTime,
    ) -> Result<f64, UptimeError>;
}
