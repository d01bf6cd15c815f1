//! Observability events: one per state transition.
//!
//! The event stream is the runtime's only notification channel — there are
//! no callbacks. Consumers (dashboards, external agents) poll or subscribe
//! to the append-only log and learn status exclusively from it.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, Architecture};
use crate::delegation::DelegationId;
use crate::operad::OperadId;
use crate::receipt::ReceiptId;

/// One state transition, emitted exactly once by its owning component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoordinationEvent {
    StepCompleted {
        operad: OperadId,
        step: usize,
        agent: AgentId,
        receipt: ReceiptId,
        cost_used: u64,
        quality_score: u32,
    },
    DelegationCreated {
        delegation: DelegationId,
        delegator: AgentId,
        architecture: Architecture,
        stake: u64,
    },
    /// Settlement outcome. Exactly one of these is ever emitted per
    /// delegation, and `success` tells which branch ran.
    DelegationSettled {
        delegation: DelegationId,
        delegate: AgentId,
        success: bool,
        amount: u64,
    },
    /// The delegator recovered escrowed stake after the deadline.
    StakeReclaimed {
        delegation: DelegationId,
        delegator: AgentId,
        amount: u64,
    },
    ReputationUpdated {
        agent: AgentId,
        new_score: u32,
        success: bool,
    },
    OperadCompleted {
        operad: OperadId,
        final_receipt: String,
        total_cost: u64,
        average_quality: u32,
    },
}

impl CoordinationEvent {
    /// Stable discriminant for log fields and consumer filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            CoordinationEvent::StepCompleted { .. } => "step-completed",
            CoordinationEvent::DelegationCreated { .. } => "delegation-created",
            CoordinationEvent::DelegationSettled { .. } => "delegation-settled",
            CoordinationEvent::StakeReclaimed { .. } => "stake-reclaimed",
            CoordinationEvent::ReputationUpdated { .. } => "reputation-updated",
            CoordinationEvent::OperadCompleted { .. } => "operad-completed",
        }
    }
}
