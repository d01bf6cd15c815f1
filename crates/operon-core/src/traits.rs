//! Core trait definitions for the Operon coordination runtime.
//!
//! These four traits define the complete trust boundary:
//!
//! - `VerificationGateway` — stateless adapter over external proof verifiers
//! - `ReceiptLedger`       — append-only, content-addressed receipt store
//! - `AgentDirectory`      — capability, stake, and reputation bookkeeping
//! - `EventSink`           — the append-only observability stream
//!
//! The orchestrator and the delegation manager wire these together; each
//! component is the sole writer of its own store, and cross-references
//! between stores are by id only.

use operon_contracts::{
    agent::{AgentId, AgentRecord, Architecture, VerificationOutcome},
    error::CoordinationResult,
    event::CoordinationEvent,
    receipt::{ComputationReceipt, ReceiptId},
};

/// Uniform adapter over heterogeneous, architecture-specific verifiers.
///
/// Implementations are **trusted** and must be pure with respect to external
/// state: identical inputs always yield the same `valid` bit, with no hidden
/// randomness and no side effects beyond resource metering. Replay
/// protection is explicitly not this component's job — it lives in the
/// receipt ledger, so the gateway can stay stateless.
pub trait VerificationGateway: Send + Sync {
    /// Validate `proof` against `public_inputs` under the named architecture.
    ///
    /// An unsupported architecture is `Err(UnsupportedArchitecture)`, never
    /// `Ok` with `valid = false`, so callers can distinguish a rejected
    /// proof from a misrouted request.
    fn validate(
        &self,
        architecture: Architecture,
        proof: &[u8],
        public_inputs: &[u64],
    ) -> CoordinationResult<VerificationOutcome>;
}

/// The append-only, hash-chained store of computation receipts.
///
/// Receipts are content-addressed: ids are globally unique by construction,
/// and chain integrity is checkable by re-deriving hashes alone — the
/// expensive external verifier is never re-invoked on reads.
pub trait ReceiptLedger: Send + Sync {
    /// Mint an immutable receipt for a verified computation.
    ///
    /// `previous` must reference an existing receipt or be `None` (genesis).
    /// Resubmission of an identical `(producing_agent, commitment,
    /// previous)` tuple is rejected with `DuplicateSubmission` — this is
    /// the system's replay guard.
    fn create_receipt(
        &self,
        outcome: &VerificationOutcome,
        previous: Option<&ReceiptId>,
        producing_agent: AgentId,
        architecture: Architecture,
        public_input_commitment: &str,
    ) -> CoordinationResult<ComputationReceipt>;

    /// Re-derive every link's hash from `receipt` back to genesis and
    /// compare. False on any mismatch or missing link.
    fn verify_chain(&self, receipt: &ReceiptId) -> bool;

    /// Read-only lookup. Never mutates state.
    fn receipt(&self, receipt: &ReceiptId) -> Option<ComputationReceipt>;
}

/// Capability, stake, and reputation bookkeeping for registered agents.
///
/// Records are mutated only through the update methods here, never directly
/// by agents, and are never deleted — `deactivate` is a soft flag.
pub trait AgentDirectory: Send + Sync {
    /// Register a new agent with its declared architectures, per-architecture
    /// cost estimates, and initial stake balance.
    fn register_agent(
        &self,
        architectures: Vec<(Architecture, u64)>,
        stake: u64,
    ) -> CoordinationResult<AgentId>;

    /// Read-only lookup. Never mutates state.
    fn agent(&self, agent: AgentId) -> Option<AgentRecord>;

    /// True only if the agent is active, declared `architecture` at
    /// registration, AND its specialization score for that architecture
    /// meets the configured minimum. The score gate prevents agents from
    /// acting on untested capabilities.
    fn is_authorized(&self, agent: AgentId, architecture: Architecture) -> bool;

    /// The agent's declared cost estimate for `architecture`, if any.
    fn cost_estimate(&self, agent: AgentId, architecture: Architecture) -> Option<u64>;

    /// Apply the asymmetric reputation rule: success is +1 capped at the
    /// configured maximum, failure is −2 floored at zero. Returns the new
    /// score.
    fn update_reputation(&self, agent: AgentId, success: bool) -> CoordinationResult<u32>;

    /// Same +1/−2 rule, applied to the per-architecture specialization score.
    fn update_specialization(
        &self,
        agent: AgentId,
        architecture: Architecture,
        success: bool,
    ) -> CoordinationResult<u32>;

    /// Same +1/−2 rule, applied to `of`'s pairwise trust toward `toward`.
    fn update_trust(
        &self,
        of: AgentId,
        toward: AgentId,
        success: bool,
    ) -> CoordinationResult<u32>;

    /// Remove `amount` from the agent's stake balance, failing atomically
    /// with `InsufficientStake` when the balance is too small.
    fn withdraw_stake(&self, agent: AgentId, amount: u64) -> CoordinationResult<()>;

    /// Add `amount` to the agent's stake balance.
    fn deposit_stake(&self, agent: AgentId, amount: u64) -> CoordinationResult<()>;

    /// Soft-deactivate the agent. The record is kept; authorization fails.
    fn deactivate(&self, agent: AgentId) -> CoordinationResult<()>;
}

/// The append-only observability stream — the runtime's sole notification
/// channel. One event per state transition; there are no callbacks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CoordinationEvent);
}
