//! Operon reference scenarios.
//!
//! Each scenario is a self-contained module that wires up real runtime
//! components (gateway, ledger, registry, orchestrator, delegation manager)
//! with simulated proof backends and demonstrates a distinct coordination
//! pattern.

use std::sync::Arc;

use operon_contracts::{
    agent::{AgentId, Architecture},
    error::CoordinationResult,
    operad::{CompositionType, OperadSpecification, StepSpec},
};
use operon_core::{InMemoryEventLog, Orchestrator};
use operon_delegation::DelegationManager;
use operon_gateway::ArchitectureGateway;
use operon_ledger::InMemoryReceiptLedger;
use operon_registry::{InMemoryAgentRegistry, RegistryConfig};

use crate::backends::{MatrixMemoryBackend, RecurrentStateBackend, SelectiveScanBackend};

pub mod dag_workflow;
pub mod escrowed_delegation;
pub mod linear_pipeline;
pub mod reputation_lifecycle;
pub mod tamper_audit;

// ── Shared wiring ─────────────────────────────────────────────────────────────

/// A fully wired runtime with inspectable handles.
///
/// The orchestrator and the delegation manager share one ledger, one
/// registry, and one event log, as they do in a deployment — receipts from
/// both flows land in the same chain.
pub struct Runtime {
    pub orchestrator: Orchestrator,
    pub delegations: DelegationManager,
    pub registry: Arc<InMemoryAgentRegistry>,
    pub ledger: Arc<InMemoryReceiptLedger>,
    pub events: Arc<InMemoryEventLog>,
}

/// Wire the runtime with all three simulated backends registered.
pub fn wire() -> Runtime {
    let mut gateway = ArchitectureGateway::new();
    gateway.register_backend(Architecture::Rwkv, Box::new(RecurrentStateBackend));
    gateway.register_backend(Architecture::Mamba, Box::new(SelectiveScanBackend));
    gateway.register_backend(Architecture::Xlstm, Box::new(MatrixMemoryBackend));
    let gateway = Arc::new(gateway);

    let registry = Arc::new(InMemoryAgentRegistry::new(RegistryConfig::default()));
    let ledger = Arc::new(InMemoryReceiptLedger::new());
    let events = Arc::new(InMemoryEventLog::new());

    let orchestrator = Orchestrator::new(
        gateway.clone(),
        ledger.clone(),
        registry.clone(),
        events.clone(),
    );
    let delegations = DelegationManager::new(
        gateway,
        ledger.clone(),
        registry.clone(),
        events.clone(),
    );

    Runtime {
        orchestrator,
        delegations,
        registry,
        ledger,
        events,
    }
}

/// Register an agent declaring a single architecture.
pub fn register_specialist(
    runtime: &Runtime,
    architecture: Architecture,
    declared_cost: u64,
    stake: u64,
) -> CoordinationResult<AgentId> {
    use operon_core::traits::AgentDirectory;

    runtime
        .registry
        .register_agent(vec![(architecture, declared_cost)], stake)
}

/// A step specification with the given gate values.
pub fn step(architecture: Architecture, quality_threshold: u32, cost_budget: u64) -> StepSpec {
    StepSpec {
        required_architecture: architecture,
        quality_threshold,
        cost_budget,
    }
}

/// An operad specification with a one-hour deadline and no expected final
/// commitment.
pub fn operad(
    composition_type: CompositionType,
    steps: Vec<StepSpec>,
    dependencies: Vec<Vec<usize>>,
) -> OperadSpecification {
    OperadSpecification {
        composition_type,
        steps,
        dependencies,
        deadline: chrono::Utc::now() + chrono::Duration::hours(1),
        expected_final_output_commitment: None,
    }
}
