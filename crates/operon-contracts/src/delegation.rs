//! Delegation contracts: escrowed single-task handoffs between agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, Architecture};

/// Unique identifier for a delegation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelegationId(pub uuid::Uuid);

impl DelegationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DelegationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DelegationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a delegation contract.
///
/// Transitions are `Pending → Accepted → {Completed, Failed}` and nothing
/// else; `Completed` and `Failed` are terminal. A contract that settles as
/// `Failed` is a normal outcome, not an exceptional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegationStatus {
    Pending,
    Accepted,
    Completed,
    Failed,
}

impl DelegationStatus {
    /// True for the two states that accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DelegationStatus::Completed | DelegationStatus::Failed)
    }
}

/// An escrowed handoff of a single task from `delegator` to whichever
/// eligible agent accepts first.
///
/// `stake` is withdrawn from the delegator when the contract is created and
/// paid out exactly once at settlement — to the delegate on success, back to
/// the delegator otherwise. `delegate` is bound exactly once, by the first
/// valid acceptor; later acceptance attempts are rejected, not queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationContract {
    pub id: DelegationId,
    pub delegator: AgentId,
    /// Unset until the first valid acceptor binds it.
    pub delegate: Option<AgentId>,
    /// The architecture the delegated task must be proven under.
    pub architecture: Architecture,
    /// Commitment to the task description. Opaque to the runtime.
    pub task_spec_hash: String,
    /// An acceptor's declared cost estimate must not exceed this.
    pub max_cost: u64,
    /// After this instant the contract rejects completion; the delegator
    /// may reclaim the escrowed stake. Checked lazily, on next interaction.
    pub deadline: DateTime<Utc>,
    pub quality_threshold: u32,
    /// The escrowed amount.
    pub stake: u64,
    /// Commitment to the output the delegate promises, bound at acceptance.
    pub output_commitment: Option<String>,
    pub status: DelegationStatus,
    pub created_at: DateTime<Utc>,
}
