//! Per-network calculator table.

use crate::{Calculator, NoOpCalculator, UptimeError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;
use warpset_types::{NetworkId, NodeId};

struct Table {
    calculators: HashMap<NetworkId, Arc<dyn Calculator>>,
    fallback: Arc<dyn Calculator>,
}

impl Table {
    fn resolve(&self, network: &NetworkId) -> &dyn Calculator {
        match self.calculators.get(network) {
            Some(calculator) => &**calculator,
            None => &*self.fallback,
        }
    }
}

/// Routes uptime queries to the calculator registered for each network.
///
/// Networks without a registered calculator use the fallback. Queries take
/// the read lock for the duration of the delegated call, so a delegate must
/// not call [`set_calculator`](Self::set_calculator) on the same table.
pub struct LockedCalculator {
    table: RwLock<Table>,
}

impl LockedCalculator {
    /// Create an empty table whose fallback is [`NoOpCalculator`].
    pub fn new() -> Self {
        Self::with_fallback(None)
    }

    /// Create an empty table with the given fallback ([`NoOpCalculator`] if `None`).
    pub fn with_fallback(fallback: Option<Arc<dyn Calculator>>) -> Self {
        Self {
            table: RwLock::new(Table {
                calculators: HashMap::new(),
                fallback: fallback.unwrap_or_else(|| Arc::new(NoOpCalculator)),
            }),
        }
    }

    /// Register `calculator` for `network`, replacing any previous one.
    ///
    /// `None` leaves the current entry untouched.
    pub fn set_calculator(&self, network: NetworkId, calculator: Option<Arc<dyn Calculator>>) {
        let Some(calculator) = calculator else {
            return;
        };
        let replaced = self
            .table
            .write()
            .calculators
            .insert(network, calculator)
            .is_some();
        debug!(network = %network, replaced, "Uptime calculator set");
    }

    /// Number of networks with a dedicated calculator.
    pub fn len(&self) -> usize {
        self.table.read().calculators.len()
    }

    /// Check whether every network uses the fallback.
    pub fn is_empty(&self) -> bool {
        self.table.read().calculators.is_empty()
    }
}

impl Default for LockedCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LockedCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.read();
        f.debug_struct("LockedCalculator")
            .field("networks", &table.calculators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Calculator for LockedCalculator {
    fn calculate_uptime(
        &self,
        node: NodeId,
        network: NetworkId,
    ) -> Result<(Duration, Duration), UptimeError> {
        self.table
            .read()
            .resolve(&network)
            .calculate_uptime(node, network)
    }

    fn calculate_uptime_percent(&self, node: NodeId, network: NetworkId) -> Result<f64, UptimeError> {
        self.table
            .read()
            .resolve(&network)
            .calculate_uptime_percent(node, network)
    }

    fn calculate_uptime_percent_from(
        &self,
        node: NodeId,
        network: NetworkId,
        from: SystemTime,
    ) -> Result<f64, UptimeError> {
        self.table
            .read()
            .resolve(&network)
            .calculate_uptime_percent_from(node, network, from)
    }
}
