//! Weighted validator registry and canonical Warp validator sets.
//!
//! # Pipeline
//!
//! ```text
//! ValidatorRegistry / ValidatorState
//!         │ snapshot: NodeId → ValidatorRecord
//!         ▼
//! flatten_validator_set ──► CanonicalValidatorSet (dedup by key, sorted)
//!         │
//!         ▼ SignerBitfield
//! filter_validators ──► sum_weight (quorum)
//!                   └─► aggregate_public_keys (verification)
//! ```
//!
//! Every stage is deterministic: two parties holding the same snapshot
//! derive the same signer positions, the same quorum weight and the same
//! aggregate key.
//!
//! The registry is safe to share across threads. The canonical functions
//! are pure and operate on caller-owned snapshots.

mod canonical;
mod config;
mod error;
mod listener;
mod record;
mod registry;
mod set;
mod signers;
mod state;

pub use canonical::{flatten_validator_set, CanonicalValidator, CanonicalValidatorSet};
pub use config::RegistryConfig;
pub use error::{CanonicalError, WarpSetError};
pub use listener::{ManagerListener, SetListener};
pub use record::{ValidatorRecord, WeightedValidator};
pub use registry::ValidatorRegistry;
pub use set::{ValidatorInfo, ValidatorSet};
pub use signers::{aggregate_public_keys, filter_validators, sum_weight};
pub use state::{canonical_validator_set, StateError, ValidatorState, WarpSet, WarpValidator};
