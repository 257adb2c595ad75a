//! Per-node validator records.

use serde::{Deserialize, Serialize};
use warpset_types::{NodeId, TxId};

/// Source of weighted, key-bearing validators for canonicalisation.
///
/// Implemented by registry records and by Warp snapshot entries so either can
/// feed [`flatten_validator_set`](crate::flatten_validator_set).
pub trait WeightedValidator {
    /// Compressed BLS public key bytes; empty when the validator has no key.
    fn public_key_bytes(&self) -> &[u8];

    /// Staking weight.
    fn weight(&self) -> u64;
}

/// A validator's registration within one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    /// Node this record belongs to.
    pub node_id: NodeId,

    /// Compressed BLS public key (classical). Empty when absent.
    #[serde(default, with = "hex_bytes")]
    pub public_key: Vec<u8>,

    /// Ringtail public key (post-quantum). Empty when absent.
    #[serde(default, with = "hex_bytes")]
    pub ringtail_public_key: Vec<u8>,

    /// Transaction that added this validator.
    #[serde(default)]
    pub tx_id: TxId,

    /// Generalised staking weight.
    #[serde(alias = "weight")]
    pub light: u64,
}

impl ValidatorRecord {
    /// Create a record without a post-quantum key.
    pub fn new(node_id: NodeId, public_key: Vec<u8>, tx_id: TxId, light: u64) -> Self {
        Self {
            node_id,
            public_key,
            ringtail_public_key: Vec::new(),
            tx_id,
            light,
        }
    }

    /// Attach a Ringtail public key.
    pub fn with_ringtail_public_key(mut self, key: Vec<u8>) -> Self {
        self.ringtail_public_key = key;
        self
    }

    /// Staking weight under its older name.
    #[deprecated(note = "use `light`")]
    pub fn weight(&self) -> u64 {
        self.light
    }
}

impl WeightedValidator for ValidatorRecord {
    fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }

    fn weight(&self) -> u64 {
        self.light
    }
}

/// Serde adapter encoding byte vectors as hex strings.
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}
