//! Fixed-size identifiers for networks, nodes and registration transactions.

use std::fmt;
use std::str::FromStr;

/// Error parsing an identifier from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    /// Wrong number of hex characters.
    #[error("invalid length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Non-hex characters.
    #[error("invalid hex")]
    InvalidHex,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Size of the identifier in bytes.
            pub const BYTES: usize = $len;

            /// Wrap raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Get bytes as slice reference.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Parse from a hex string of exactly `2 * BYTES` characters.
            pub fn from_hex(hex: &str) -> Result<Self, IdParseError> {
                if hex.len() != $len * 2 {
                    return Err(IdParseError::InvalidLength {
                        expected: $len * 2,
                        actual: hex.len(),
                    });
                }
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(hex, &mut bytes).map_err(|_| IdParseError::InvalidHex)?;
                Ok(Self(bytes))
            }

            /// Convert to a lowercase hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Random identifier for tests.
            #[cfg(any(test, feature = "test-utils"))]
            pub fn generate_test() -> Self {
                let mut bytes = [0u8; $len];
                rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..)", stringify!($name), &self.to_hex()[..8])
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_id!(
    /// Identifier of a logical network (subnet or chain) whose validator set
    /// is tracked independently of all others.
    NetworkId,
    32
);

define_id!(
    /// Identifier of a physical validator process.
    ///
    /// Several node ids may share one BLS key when an operator runs multiple
    /// nodes under the same key.
    NodeId,
    20
);

define_id!(
    /// Identifier of the transaction that registered a validator.
    TxId,
    32
);

impl NetworkId {
    /// The primary network.
    pub const PRIMARY: Self = Self([0u8; 32]);
}

impl TxId {
    /// Placeholder for records without a registration transaction.
    pub const EMPTY: Self = Self([0u8; 32]);
}
