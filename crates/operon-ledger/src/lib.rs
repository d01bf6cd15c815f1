//! # operon-ledger
//!
//! Append-only, content-addressed, SHA-256 hash-chained receipt ledger for
//! the Operon runtime.
//!
//! ## Overview
//!
//! Every verified computation is minted as a `ComputationReceipt` whose id
//! is the hash of its own content, including the link to the previous
//! receipt. Tampering with any field — even a single byte — breaks the id
//! and is detected by `verify_chain` without ever re-invoking the external
//! verifier.
//!
//! The ledger is also the system's replay guard: resubmitting an identical
//! `(agent, commitment, previous)` tuple is rejected here, keeping the
//! verification gateway stateless.

pub mod chain;
pub mod memory;

pub use chain::{receipt_digest, verify_receipt, GENESIS_RECEIPT};
pub use memory::InMemoryReceiptLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use operon_contracts::{
        agent::{AgentId, Architecture, VerificationOutcome},
        error::CoordinationError,
        receipt::ReceiptId,
    };
    use operon_core::traits::ReceiptLedger;

    use super::InMemoryReceiptLedger;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn outcome(quality: u32, cost: u64) -> VerificationOutcome {
        VerificationOutcome {
            valid: true,
            quality_score: quality,
            cost_used: cost,
        }
    }

    /// Mint a three-link chain produced by one agent.
    fn three_link_chain(ledger: &InMemoryReceiptLedger, agent: AgentId) -> Vec<ReceiptId> {
        let first = ledger
            .create_receipt(&outcome(90, 10), None, agent, Architecture::Rwkv, "c0")
            .unwrap();
        let second = ledger
            .create_receipt(&outcome(85, 12), Some(&first.id), agent, Architecture::Mamba, "c1")
            .unwrap();
        let third = ledger
            .create_receipt(&outcome(95, 8), Some(&second.id), agent, Architecture::Xlstm, "c2")
            .unwrap();
        vec![first.id, second.id, third.id]
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    /// Every receipt the ledger mints verifies back to genesis.
    #[test]
    fn test_chain_integrity() {
        let ledger = InMemoryReceiptLedger::new();
        let ids = three_link_chain(&ledger, AgentId::new());

        for id in &ids {
            assert!(ledger.verify_chain(id), "chain from {} must verify", id);
        }
    }

    /// Mutating any stored field breaks verification from every descendant.
    #[test]
    fn test_tamper_detection() {
        let ledger = InMemoryReceiptLedger::new();
        let ids = three_link_chain(&ledger, AgentId::new());

        // Directly mutate the arena to simulate tampering.
        {
            let mut state = ledger.state.lock().unwrap();
            let first = state.receipts.get_mut(&ids[0]).unwrap();
            first.quality_score = 1;
        }

        assert!(!ledger.verify_chain(&ids[0]), "altered receipt must fail");
        assert!(
            !ledger.verify_chain(&ids[2]),
            "descendants of an altered receipt must fail"
        );
    }

    /// A receipt with no predecessor links to genesis (previous = None).
    #[test]
    fn test_genesis_receipt() {
        let ledger = InMemoryReceiptLedger::new();
        let receipt = ledger
            .create_receipt(&outcome(90, 10), None, AgentId::new(), Architecture::Rwkv, "c0")
            .unwrap();

        assert_eq!(receipt.previous_receipt, None);
        assert_eq!(receipt.sequence, 0);
        assert!(ledger.verify_chain(&receipt.id));
    }

    /// Ids are content hashes: 64 lowercase hex chars, all distinct.
    #[test]
    fn test_ids_are_content_addressed() {
        let ledger = InMemoryReceiptLedger::new();
        let ids = three_link_chain(&ledger, AgentId::new());

        for id in &ids {
            assert_eq!(id.0.len(), 64);
            assert!(id.0.chars().all(|c| c.is_ascii_hexdigit()));
        }
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    /// Sequence numbers are 0, 1, 2, … in mint order.
    #[test]
    fn test_sequence_monotonic() {
        let ledger = InMemoryReceiptLedger::new();
        let agent = AgentId::new();
        let ids = three_link_chain(&ledger, agent);

        for (idx, id) in ids.iter().enumerate() {
            assert_eq!(ledger.receipt(id).unwrap().sequence, idx as u64);
        }
    }

    /// The replay guard rejects the identical (agent, commitment, previous)
    /// tuple on the second attempt.
    #[test]
    fn test_replay_rejected() {
        let ledger = InMemoryReceiptLedger::new();
        let agent = AgentId::new();

        ledger
            .create_receipt(&outcome(90, 10), None, agent, Architecture::Rwkv, "c0")
            .unwrap();
        let replay =
            ledger.create_receipt(&outcome(90, 10), None, agent, Architecture::Rwkv, "c0");

        assert!(matches!(
            replay,
            Err(CoordinationError::DuplicateSubmission { .. })
        ));
        assert_eq!(ledger.len(), 1, "replay must not mint a second receipt");
    }

    /// A different agent submitting the same commitment is not a replay.
    #[test]
    fn test_same_commitment_different_agent_is_allowed() {
        let ledger = InMemoryReceiptLedger::new();

        ledger
            .create_receipt(&outcome(90, 10), None, AgentId::new(), Architecture::Rwkv, "c0")
            .unwrap();
        let other =
            ledger.create_receipt(&outcome(90, 10), None, AgentId::new(), Architecture::Rwkv, "c0");

        assert!(other.is_ok());
    }

    /// Linking to a receipt the ledger has never seen is rejected.
    #[test]
    fn test_unknown_previous_rejected() {
        let ledger = InMemoryReceiptLedger::new();
        let phantom = ReceiptId("ab".repeat(32));

        let result = ledger.create_receipt(
            &outcome(90, 10),
            Some(&phantom),
            AgentId::new(),
            Architecture::Rwkv,
            "c0",
        );

        assert!(matches!(result, Err(CoordinationError::UnknownEntity { .. })));
        assert!(ledger.is_empty());
    }

    /// Verifying an id the ledger has never seen is false, not a panic.
    #[test]
    fn test_verify_unknown_id() {
        let ledger = InMemoryReceiptLedger::new();
        assert!(!ledger.verify_chain(&ReceiptId("cd".repeat(32))));
    }
}
