//! In-memory implementation of `ReceiptLedger`.
//!
//! `InMemoryReceiptLedger` keeps receipts in a content-addressed arena — a
//! map keyed by receipt id — behind a `Mutex`, with a global append counter
//! for sequence numbers and a tuple set implementing the replay guard.
//!
//! The replay guard lives here rather than in the verification gateway
//! because the gateway must stay stateless: the ledger is the one component
//! that already remembers what it has seen.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use operon_contracts::{
    agent::{AgentId, Architecture, VerificationOutcome},
    error::{CoordinationError, CoordinationResult},
    receipt::{ComputationReceipt, ReceiptId},
};
use operon_core::traits::ReceiptLedger;

use crate::chain::{receipt_digest, verify_receipt};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    /// The content-addressed arena: every receipt ever minted, keyed by id.
    pub(crate) receipts: HashMap<ReceiptId, ComputationReceipt>,

    /// Replay guard: every `(agent, commitment, previous)` tuple already
    /// recorded. A resubmission of the exact tuple is rejected.
    pub(crate) seen: HashSet<(AgentId, String, Option<ReceiptId>)>,

    /// The next global sequence number (starts at 0).
    pub(crate) sequence: u64,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory, append-only receipt ledger.
///
/// Records are write-once: nothing in the public interface mutates a stored
/// receipt, and chain verification re-derives content hashes rather than
/// trusting stored state.
pub struct InMemoryReceiptLedger {
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl InMemoryReceiptLedger {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                receipts: HashMap::new(),
                seen: HashSet::new(),
                sequence: 0,
            })),
        }
    }

    /// Number of receipts minted so far.
    pub fn len(&self) -> usize {
        self.state.lock().expect("ledger lock poisoned").receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryReceiptLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptLedger for InMemoryReceiptLedger {
    /// Mint a receipt for a verified computation.
    ///
    /// Rejects an unknown `previous` link (`UnknownEntity`) and a replayed
    /// `(agent, commitment, previous)` tuple (`DuplicateSubmission`), in
    /// that order, with no state written on either rejection.
    fn create_receipt(
        &self,
        outcome: &VerificationOutcome,
        previous: Option<&ReceiptId>,
        producing_agent: AgentId,
        architecture: Architecture,
        public_input_commitment: &str,
    ) -> CoordinationResult<ComputationReceipt> {
        let mut state = self.state.lock().map_err(|e| CoordinationError::LockPoisoned {
            reason: format!("receipt ledger: {}", e),
        })?;

        if let Some(prev) = previous {
            if !state.receipts.contains_key(prev) {
                return Err(CoordinationError::UnknownEntity {
                    kind: "receipt".to_string(),
                    id: prev.to_string(),
                });
            }
        }

        let tuple = (
            producing_agent,
            public_input_commitment.to_string(),
            previous.cloned(),
        );
        if state.seen.contains(&tuple) {
            return Err(CoordinationError::DuplicateSubmission {
                reason: format!(
                    "agent {} already submitted commitment {} against this predecessor",
                    producing_agent, public_input_commitment
                ),
            });
        }

        let sequence = state.sequence;
        let timestamp = Utc::now();
        let id = ReceiptId(receipt_digest(
            producing_agent,
            architecture,
            previous,
            public_input_commitment,
            outcome.quality_score,
            outcome.cost_used,
            sequence,
            timestamp,
        ));

        let receipt = ComputationReceipt {
            id: id.clone(),
            producing_agent,
            architecture,
            previous_receipt: previous.cloned(),
            public_input_commitment: public_input_commitment.to_string(),
            quality_score: outcome.quality_score,
            cost_used: outcome.cost_used,
            sequence,
            timestamp,
        };

        debug!(
            receipt = %id,
            agent = %producing_agent,
            architecture = %architecture,
            sequence,
            "receipt minted"
        );

        state.receipts.insert(id, receipt.clone());
        state.seen.insert(tuple);
        state.sequence += 1;

        Ok(receipt)
    }

    /// Walk the chain from `receipt` back to genesis, re-deriving each
    /// link's digest. False on any digest mismatch or missing link.
    ///
    /// The expensive external verifier is never consulted here; hashing
    /// alone proves the chain was not altered.
    fn verify_chain(&self, receipt: &ReceiptId) -> bool {
        let state = self.state.lock().expect("ledger lock poisoned");

        let mut current = match state.receipts.get(receipt) {
            Some(r) => r,
            None => return false,
        };

        loop {
            if !verify_receipt(current) {
                return false;
            }
            match &current.previous_receipt {
                None => return true,
                Some(prev) => match state.receipts.get(prev) {
                    Some(r) => current = r,
                    None => return false,
                },
            }
        }
    }

    fn receipt(&self, receipt: &ReceiptId) -> Option<ComputationReceipt> {
        self.state
            .lock()
            .expect("ledger lock poisoned")
            .receipts
            .get(receipt)
            .cloned()
    }
}
