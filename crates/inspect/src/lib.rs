//! Operator tooling for warpset validator snapshots.
//!
//! Backs the `warpset-inspect` binary: load a TOML snapshot, build its
//! canonical validator set, and check a signer selector against a quorum
//! threshold.

mod quorum;
mod selection;
mod snapshot;

pub use quorum::QuorumThreshold;
pub use selection::{select, Selection};
pub use snapshot::Snapshot;

use std::fmt::Write;
use warpset_validators::CanonicalValidatorSet;

/// Human-readable listing of a canonical set, one entry per line.
pub fn render_canonical_set(set: &CanonicalValidatorSet) -> String {
    let mut out = String::new();
    for (i, vdr) in set.validators.iter().enumerate() {
        let nodes: Vec<String> = vdr.node_ids.iter().map(ToString::to_string).collect();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "[{i}] weight={} key={} nodes={}",
            vdr.weight,
            hex::encode(vdr.public_key.to_compressed_bytes()),
            nodes.join(",")
        );
    }
    let _ = write!(
        out,
        "{} canonical validators, total weight {}",
        set.len(),
        set.total_weight
    );
    out
}
