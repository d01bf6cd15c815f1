//! Agent identity, capability, and score types.
//!
//! An `AgentRecord` is created once at registration and afterwards mutated
//! only by the reputation-update routines — never directly by agents, and
//! never deleted (deactivation is a soft flag).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The model architectures the coordination layer knows how to route
/// proofs for. Each architecture has its own external verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "RWKV")]
    Rwkv,
    Mamba,
    #[serde(rename = "xLSTM")]
    Xlstm,
}

impl Architecture {
    /// Stable tag used in hash inputs and log fields.
    pub fn tag(&self) -> &'static str {
        match self {
            Architecture::Rwkv => "RWKV",
            Architecture::Mamba => "Mamba",
            Architecture::Xlstm => "xLSTM",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Unique identifier for a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub uuid::Uuid);

impl AgentId {
    /// Create a new, unique agent ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The registry's record of one agent.
///
/// `stake` is a spendable balance: delegation escrow withdraws from it at
/// contract creation and settlement deposits to exactly one party.
/// `reputation` and every `specialization` score are clamped to
/// `[0, max_reputation]` by the registry; the asymmetric +1/−2 update rule
/// lives there, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    /// Architectures declared at registration. Authorization is impossible
    /// for anything outside this set, regardless of later score changes.
    pub architectures: HashSet<Architecture>,
    /// Declared per-architecture cost estimate, checked against a
    /// delegation's `max_cost` before the agent may accept it.
    pub cost_estimates: HashMap<Architecture, u64>,
    /// Spendable stake balance.
    pub stake: u64,
    /// Global reputation score.
    pub reputation: u32,
    /// Per-architecture specialization score gating authorization.
    pub specialization: HashMap<Architecture, u32>,
    /// Pairwise trust toward other agents, updated on delegation settlement.
    pub trust: HashMap<AgentId, u32>,
    /// Soft-deactivation flag. Inactive agents fail every authorization check.
    pub active: bool,
    pub registered_at: DateTime<Utc>,
}

/// The outcome of one external verifier call.
///
/// Ephemeral: produced per call, consumed immediately, never
/// persisted. The durable artifact is the `ComputationReceipt` derived
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Whether the proof verified. Deterministic for identical inputs.
    pub valid: bool,
    pub quality_score: u32,
    pub cost_used: u64,
}
