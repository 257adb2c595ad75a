//! Domain-separated signing messages.
//!
//! Every signed Warp payload is prefixed with a domain tag so a signature
//! produced for one purpose cannot be replayed in another.

use crate::NetworkId;

/// Domain tag for cross-network Warp messages.
///
/// Format: `WARP_MESSAGE` || source_network || payload_len (u32 LE) || payload
pub const DOMAIN_WARP_MESSAGE: &[u8] = b"WARP_MESSAGE";

/// Build the signing message for a Warp payload emitted by `source_network`.
pub fn warp_message(source_network: &NetworkId, payload: &[u8]) -> Vec<u8> {
    let mut message =
        Vec::with_capacity(DOMAIN_WARP_MESSAGE.len() + NetworkId::BYTES + 4 + payload.len());
    message.extend_from_slice(DOMAIN_WARP_MESSAGE);
    message.extend_from_slice(source_network.as_bytes());
    message.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    message.extend_from_slice(payload);
    message
}
