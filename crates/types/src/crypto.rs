//! BLS12-381 keys and signatures for Warp message attestation.
//!
//! Uses the min-pk variant: public keys live in G1 (48 bytes compressed,
//! 96 bytes uncompressed) and signatures in G2 (96 bytes compressed). The
//! uncompressed public key encoding is the canonical form used to order and
//! deduplicate validators.

use std::fmt;

/// Domain separation tag for Warp signatures (proof-of-possession ciphersuite).
pub const WARP_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Size of a compressed public key.
pub const PUBLIC_KEY_COMPRESSED_LEN: usize = 48;

/// Size of an uncompressed public key.
pub const PUBLIC_KEY_UNCOMPRESSED_LEN: usize = 96;

/// Size of a compressed signature.
pub const SIGNATURE_LEN: usize = 96;

/// Errors decoding keys or signatures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyDecodeError {
    /// Input had the wrong length for the requested encoding.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Bytes did not describe a valid point in the correct subgroup.
    #[error("invalid point encoding")]
    InvalidPoint,
}

/// Errors that can occur during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// Empty list provided.
    #[error("Cannot aggregate empty list")]
    Empty,

    /// Aggregation operation failed.
    #[error("Aggregation failed")]
    AggregationFailed,
}

/// A validated BLS12-381 public key.
#[derive(Clone)]
pub struct Bls12381PublicKey(blst::min_pk::PublicKey);

impl Bls12381PublicKey {
    /// Decode a 48-byte compressed key.
    ///
    /// Rejects the identity point and points outside the prime-order subgroup.
    pub fn from_compressed_bytes(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        if bytes.len() != PUBLIC_KEY_COMPRESSED_LEN {
            return Err(KeyDecodeError::InvalidLength {
                expected: PUBLIC_KEY_COMPRESSED_LEN,
                actual: bytes.len(),
            });
        }
        blst::min_pk::PublicKey::key_validate(bytes)
            .map(Self)
            .map_err(|_| KeyDecodeError::InvalidPoint)
    }

    /// Decode a 96-byte uncompressed key.
    pub fn from_uncompressed_bytes(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        if bytes.len() != PUBLIC_KEY_UNCOMPRESSED_LEN {
            return Err(KeyDecodeError::InvalidLength {
                expected: PUBLIC_KEY_UNCOMPRESSED_LEN,
                actual: bytes.len(),
            });
        }
        let pk = blst::min_pk::PublicKey::deserialize(bytes)
            .map_err(|_| KeyDecodeError::InvalidPoint)?;
        pk.validate().map_err(|_| KeyDecodeError::InvalidPoint)?;
        Ok(Self(pk))
    }

    /// 48-byte compressed encoding.
    pub fn to_compressed_bytes(&self) -> [u8; PUBLIC_KEY_COMPRESSED_LEN] {
        self.0.compress()
    }

    /// 96-byte uncompressed encoding; the canonical form for ordering.
    pub fn to_uncompressed_bytes(&self) -> [u8; PUBLIC_KEY_UNCOMPRESSED_LEN] {
        self.0.serialize()
    }

    /// Aggregate public keys into one.
    ///
    /// Keys are assumed already validated (they can only be built through the
    /// checked decoders or from a private key). An empty input returns
    /// [`AggregateError::Empty`], never the identity point.
    pub fn aggregate(pubkeys: &[&Bls12381PublicKey]) -> Result<Self, AggregateError> {
        if pubkeys.is_empty() {
            return Err(AggregateError::Empty);
        }

        let refs: Vec<&blst::min_pk::PublicKey> = pubkeys.iter().map(|pk| &pk.0).collect();
        let agg = blst::min_pk::AggregatePublicKey::aggregate(&refs, false)
            .map_err(|_| AggregateError::AggregationFailed)?;

        Ok(Self(agg.to_public_key()))
    }
}

impl PartialEq for Bls12381PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed_bytes() == other.to_compressed_bytes()
    }
}

impl Eq for Bls12381PublicKey {}

impl fmt::Debug for Bls12381PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = hex::encode(self.to_compressed_bytes());
        write!(
            f,
            "Bls12381PublicKey({}..{})",
            &hex[..8],
            &hex[hex.len() - 8..]
        )
    }
}

/// A BLS12-381 private key.
#[derive(Clone)]
pub struct Bls12381PrivateKey(blst::min_pk::SecretKey);

impl Bls12381PrivateKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut ikm = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut ikm);
        Self::from_seed(&ikm)
    }

    /// Derive a key deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        // key_gen only fails for IKM shorter than 32 bytes.
        let sk = blst::min_pk::SecretKey::key_gen(seed, &[])
            .unwrap_or_else(|_| unreachable!("32-byte IKM is always accepted"));
        Self(sk)
    }

    /// The corresponding public key.
    pub fn public_key(&self) -> Bls12381PublicKey {
        Bls12381PublicKey(self.0.sk_to_pk())
    }

    /// Sign a message under [`WARP_DST`].
    pub fn sign(&self, message: &[u8]) -> Bls12381Signature {
        Bls12381Signature(self.0.sign(message, WARP_DST, &[]))
    }
}

impl fmt::Debug for Bls12381PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Bls12381PrivateKey(..)")
    }
}

/// A BLS12-381 signature.
#[derive(Clone)]
pub struct Bls12381Signature(blst::min_pk::Signature);

impl Bls12381Signature {
    /// Decode a 96-byte compressed signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(KeyDecodeError::InvalidLength {
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            });
        }
        blst::min_pk::Signature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| KeyDecodeError::InvalidPoint)
    }

    /// 96-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }

    /// Verify against a (possibly aggregate) public key.
    pub fn verify(&self, message: &[u8], public_key: &Bls12381PublicKey) -> bool {
        self.0.verify(true, message, WARP_DST, &[], &public_key.0, false)
            == blst::BLST_ERROR::BLST_SUCCESS
    }

    /// Aggregate multiple signatures over the same message.
    pub fn aggregate(signatures: &[&Bls12381Signature]) -> Result<Self, AggregateError> {
        if signatures.is_empty() {
            return Err(AggregateError::Empty);
        }

        let refs: Vec<&blst::min_pk::Signature> = signatures.iter().map(|s| &s.0).collect();
        let agg = blst::min_pk::AggregateSignature::aggregate(&refs, true)
            .map_err(|_| AggregateError::AggregationFailed)?;

        Ok(Self(agg.to_signature()))
    }
}

impl PartialEq for Bls12381Signature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Bls12381Signature {}

impl fmt::Debug for Bls12381Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bls12381Signature({}..)", &hex::encode(self.to_bytes())[..16])
    }
}
