//! Computation receipts: content-addressed attestations of verified work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, Architecture};

/// Content hash identifying a receipt: 64 lowercase hex characters of
/// SHA-256 over every other receipt field, including the link to the
/// previous receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable record attesting that one agent's computation passed
/// verification.
///
/// Because `id` commits to all other fields — `previous_receipt` included —
/// the integrity of an entire chain can be checked by re-deriving hashes
/// alone, without re-invoking the external verifier on any link.
/// No field is ever mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationReceipt {
    pub id: ReceiptId,
    pub producing_agent: AgentId,
    pub architecture: Architecture,
    /// The previous link in the chain, or `None` for a genesis receipt.
    pub previous_receipt: Option<ReceiptId>,
    /// Commitment to the public inputs the verifier saw.
    pub public_input_commitment: String,
    pub quality_score: u32,
    pub cost_used: u64,
    /// Position in the ledger's global append order.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}
