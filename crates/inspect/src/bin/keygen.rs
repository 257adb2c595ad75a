//! Simple tool to generate validator BLS keys and print public keys.
//!
//! Usage:
//!   warpset-keygen <seed_hex>                  - Print the public key for a 32-byte seed (hex)
//!   warpset-keygen --generate                  - Generate a random keypair and print its public key
//!   warpset-keygen <seed_hex> --node-id <hex> --weight 100
//!                                              - Print a snapshot `[[validators]]` entry

use anyhow::{bail, Context, Result};
use clap::Parser;
use warpset_types::{Bls12381PrivateKey, NodeId};

/// Derives BLS public keys for validator snapshots.
#[derive(Parser, Debug)]
#[command(name = "warpset-keygen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 32-byte seed, hex encoded
    #[arg(required_unless_present = "generate")]
    seed: Option<String>,

    /// Generate a random keypair instead of deriving one
    #[arg(long, conflicts_with = "seed")]
    generate: bool,

    /// Emit a snapshot entry for this node ID
    #[arg(long, requires = "weight")]
    node_id: Option<NodeId>,

    /// Weight for the snapshot entry
    #[arg(long, requires = "node_id")]
    weight: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let keypair = if cli.generate {
        Bls12381PrivateKey::generate()
    } else {
        let Some(seed_hex) = cli.seed.as_deref() else {
            bail!("A seed is required unless --generate is given");
        };
        let seed_bytes = hex::decode(seed_hex).context("Invalid hex seed")?;
        let seed: [u8; 32] = seed_bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("Seed must be 32 bytes (64 hex chars)"))?;
        Bls12381PrivateKey::from_seed(&seed)
    };
    let public_key = hex::encode(keypair.public_key().to_compressed_bytes());

    match (cli.node_id, cli.weight) {
        (Some(node_id), Some(weight)) => {
            println!("[[validators]]");
            println!("node_id = \"{node_id}\"");
            println!("public_key = \"{public_key}\"");
            println!("weight = {weight}");
        }
        // Just print the public key (for script consumption)
        _ => println!("{public_key}"),
    }

    Ok(())
}
