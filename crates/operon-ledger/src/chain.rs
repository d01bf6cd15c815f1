//! Hash-chain primitives: receipt digests and link verification.
//!
//! A receipt's id is the SHA-256 of its content, so the chain needs no
//! pointers — links are content hashes, and an arena keyed by hash holds
//! the records. Every field that contributes to the digest is listed
//! explicitly so nothing is accidentally omitted.
//!
//! Digest input layout (bytes, in order):
//!   1. producing agent UUID (16 raw bytes)
//!   2. architecture tag as UTF-8
//!   3. previous receipt id as UTF-8, or the genesis sentinel
//!   4. public input commitment as UTF-8
//!   5. quality_score as 4-byte little-endian
//!   6. cost_used as 8-byte little-endian
//!   7. sequence as 8-byte little-endian
//!   8. timestamp as microseconds since epoch, 8-byte little-endian

use sha2::{Digest, Sha256};

use chrono::{DateTime, Utc};
use operon_contracts::{
    agent::{AgentId, Architecture},
    receipt::{ComputationReceipt, ReceiptId},
};

/// The sentinel standing in for `previous_receipt` on genesis receipts.
///
/// 64 hex zeros — a value that can never be the SHA-256 of real content,
/// making genesis detection unambiguous.
pub const GENESIS_RECEIPT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Compute the content digest for a receipt's fields.
///
/// Returns a lowercase 64-character hex string. Two receipts with identical
/// content would collide, but the ledger's replay guard rejects identical
/// `(agent, commitment, previous)` tuples before a second digest is ever
/// computed, and the global `sequence` differs for everything else.
#[allow(clippy::too_many_arguments)]
pub fn receipt_digest(
    producing_agent: AgentId,
    architecture: Architecture,
    previous: Option<&ReceiptId>,
    public_input_commitment: &str,
    quality_score: u32,
    cost_used: u64,
    sequence: u64,
    timestamp: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(producing_agent.0.as_bytes());
    hasher.update(architecture.tag().as_bytes());
    hasher.update(previous.map(|p| p.0.as_str()).unwrap_or(GENESIS_RECEIPT).as_bytes());
    hasher.update(public_input_commitment.as_bytes());
    hasher.update(quality_score.to_le_bytes());
    hasher.update(cost_used.to_le_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(timestamp.timestamp_micros().to_le_bytes());

    hex::encode(hasher.finalize())
}

/// Recompute a receipt's digest from its own fields and compare to its id.
///
/// False means the receipt was altered after creation — any single-byte
/// change to any field invalidates the id.
pub fn verify_receipt(receipt: &ComputationReceipt) -> bool {
    let recomputed = receipt_digest(
        receipt.producing_agent,
        receipt.architecture,
        receipt.previous_receipt.as_ref(),
        &receipt.public_input_commitment,
        receipt.quality_score,
        receipt.cost_used,
        receipt.sequence,
        receipt.timestamp,
    );
    receipt.id.0 == recomputed
}
