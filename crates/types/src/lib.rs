//! Core types for warpset.
//!
//! This crate provides the leaf types shared by the validator registry and
//! the canonical Warp set pipeline:
//!
//! - **Identifiers**: NetworkId, NodeId, TxId
//! - **Weights**: overflow-checked weight arithmetic
//! - **Signers**: SignerBitfield, the compact bit-indexed signer selector
//! - **Crypto**: BLS12-381 public keys, private keys and signatures
//!
//! It does not depend on any other workspace crates.

mod crypto;
mod identifiers;
mod signer_bitfield;
mod signing;
mod weight;

pub use crypto::{
    AggregateError, Bls12381PrivateKey, Bls12381PublicKey, Bls12381Signature, KeyDecodeError,
    PUBLIC_KEY_COMPRESSED_LEN, PUBLIC_KEY_UNCOMPRESSED_LEN, SIGNATURE_LEN, WARP_DST,
};
pub use identifiers::{IdParseError, NetworkId, NodeId, TxId};
pub use signer_bitfield::SignerBitfield;
pub use signing::{warp_message, DOMAIN_WARP_MESSAGE};
pub use weight::{add_weight, sum_weights, WeightOverflow};
