//! Validator snapshot files.
//!
//! A snapshot is a TOML document listing one network's validators:
//!
//! ```toml
//! network = "aa…aa"          # optional, hex; primary network when absent
//!
//! [[validators]]
//! node_id = "0101…01"        # 20 bytes, hex
//! public_key = "a1b2…"       # compressed BLS key, hex; optional
//! weight = 100               # `light` is accepted too
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use warpset_types::{NetworkId, NodeId};
use warpset_validators::{
    flatten_validator_set, CanonicalValidatorSet, RegistryConfig, ValidatorRecord,
    ValidatorRegistry,
};

/// A parsed snapshot file.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Network the validators belong to.
    #[serde(default)]
    pub network: NetworkId,

    /// Registry settings used by [`to_registry`](Self::to_registry).
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Validator entries in file order.
    #[serde(default)]
    pub validators: Vec<ValidatorRecord>,
}

impl Snapshot {
    /// Load a snapshot from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))
    }

    /// Parse a snapshot from TOML text.
    ///
    /// Rejects duplicate node IDs: a node holds exactly one record per network.
    pub fn parse(contents: &str) -> Result<Self> {
        let snapshot: Snapshot = toml::from_str(contents)?;

        let mut seen = HashMap::with_capacity(snapshot.validators.len());
        for (i, record) in snapshot.validators.iter().enumerate() {
            if let Some(first) = seen.insert(record.node_id, i) {
                bail!(
                    "Duplicate node {} in validators[{}] (first at validators[{}])",
                    record.node_id,
                    i,
                    first
                );
            }
        }

        Ok(snapshot)
    }

    /// The entries as a `node → record` map.
    pub fn records(&self) -> HashMap<NodeId, ValidatorRecord> {
        self.validators
            .iter()
            .map(|r| (r.node_id, r.clone()))
            .collect()
    }

    /// Canonicalise the entries.
    pub fn canonical_set(&self) -> Result<CanonicalValidatorSet> {
        flatten_validator_set(&self.records()).context("Failed to build canonical validator set")
    }

    /// Stake every entry into a fresh registry on [`network`](Self::network).
    ///
    /// Zero-weight entries are skipped by the registry.
    pub fn to_registry(&self) -> ValidatorRegistry {
        let registry = ValidatorRegistry::with_config(self.registry.clone());
        for record in &self.validators {
            registry.add_record(self.network, record.clone());
        }
        registry
    }
}
