//! Warpset snapshot inspector
//!
//! # Usage
//!
//! ```bash
//! # List the canonical validator set of a snapshot
//! warpset-inspect canonical --snapshot validators.toml
//!
//! # Check which validators a signer bitfield selects, and whether they reach quorum
//! warpset-inspect select --snapshot validators.toml --bitfield 0b
//! warpset-inspect select --snapshot validators.toml --indices 0,1,3 --quorum 2/3
//!
//! # Sample validators through the registry
//! warpset-inspect sample --snapshot validators.toml --size 3
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use warpset_inspect::{render_canonical_set, select, QuorumThreshold, Snapshot};
use warpset_types::SignerBitfield;

/// Inspects canonical Warp validator sets built from snapshot files.
#[derive(Parser, Debug)]
#[command(name = "warpset-inspect")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level filter (overrides RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical validator set
    Canonical {
        /// Path to the snapshot file (TOML)
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Apply a signer selector and check quorum
    Select {
        /// Path to the snapshot file (TOML)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Signer bitfield as big-endian hex
        #[arg(long, conflicts_with = "indices")]
        bitfield: Option<String>,

        /// Canonical positions of the signers
        #[arg(long, value_delimiter = ',')]
        indices: Vec<usize>,

        /// Required fraction of the total weight
        #[arg(long, default_value_t = QuorumThreshold::default())]
        quorum: QuorumThreshold,
    },

    /// Sample node IDs from the snapshot's registry
    Sample {
        /// Path to the snapshot file (TOML)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Number of validators to sample
        #[arg(long)]
        size: usize,

        /// Seed for the sampler (overrides the snapshot's registry config)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_signers(bitfield: Option<&str>, indices: &[usize]) -> Result<SignerBitfield> {
    match bitfield {
        Some(hex_str) => {
            let bytes = hex::decode(hex_str.trim_start_matches("0x"))
                .with_context(|| format!("Invalid signer bitfield '{hex_str}'"))?;
            Ok(SignerBitfield::from_bytes(&bytes))
        }
        None => Ok(SignerBitfield::from_indices(indices.iter().copied())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Canonical { snapshot } => {
            let snapshot = Snapshot::load(&snapshot)?;
            debug!(
                network = %snapshot.network,
                entries = snapshot.validators.len(),
                "Loaded snapshot"
            );
            let set = snapshot.canonical_set()?;
            println!("{}", render_canonical_set(&set));
        }

        Command::Select {
            snapshot,
            bitfield,
            indices,
            quorum,
        } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let set = snapshot.canonical_set()?;
            let signers = parse_signers(bitfield.as_deref(), &indices)?;

            let selection = select(&set, &signers, quorum)
                .context("Signer selector does not match the canonical set")?;
            info!(
                signed_weight = selection.signed_weight,
                total_weight = selection.total_weight,
                quorum = %quorum,
                "Selection weighed"
            );
            println!("{selection}");
        }

        Command::Sample {
            snapshot,
            size,
            seed,
        } => {
            let mut snapshot = Snapshot::load(&snapshot)?;
            if let Some(seed) = seed {
                snapshot.registry.sample_seed = Some(seed);
            }
            let registry = snapshot.to_registry();
            if registry.count(snapshot.network) == 0 {
                bail!("Snapshot has no validator with non-zero weight");
            }
            for node in registry.sample(snapshot.network, size) {
                println!("{node}");
            }
        }
    }

    Ok(())
}
