//! Scenario 3: Escrowed Delegation
//!
//! A delegator escrows stake for an RWKV task with a hard cost ceiling. An
//! expensive specialist (declared cost 150) tries to accept and is turned
//! away before binding; an affordable one (declared cost 80) binds, does
//! the work, and is paid atomically on verification.
//!
//! Walk-through for the demo run:
//!   1. Delegator escrows 300 stake, max cost 100, quality threshold 70
//!   2. Specialist declaring cost 150 is rejected — delegation stays open
//!   3. Specialist declaring cost 80 accepts and commits to its output
//!   4. Verified work settles: stake paid, reputation +1, receipt minted

use chrono::{Duration, Utc};

use operon_contracts::{
    agent::Architecture,
    error::{CoordinationError, CoordinationResult},
};
use operon_core::orchestrator::commit_public_inputs;
use operon_core::traits::AgentDirectory;
use operon_delegation::SettlementOutcome;

use crate::backends::proof_with_quality;
use crate::scenarios::{register_specialist, wire};

/// Run Scenario 3: Escrowed Delegation.
pub fn run_scenario() -> CoordinationResult<()> {
    println!("=== Scenario 3: Escrowed Delegation ===");
    println!();

    let runtime = wire();

    let delegator = register_specialist(&runtime, Architecture::Mamba, 40, 1_000)?;
    let expensive = register_specialist(&runtime, Architecture::Rwkv, 150, 0)?;
    let affordable = register_specialist(&runtime, Architecture::Rwkv, 80, 0)?;

    let id = runtime.delegations.create_delegation(
        delegator,
        Architecture::Rwkv,
        "sequence-labeling-v2",
        100,
        Utc::now() + Duration::hours(1),
        70,
        300,
    )?;
    println!("  Delegation {} created: 300 stake escrowed, max cost 100", id);

    let inputs = [11u64, 13, 17];
    let commitment = commit_public_inputs(&inputs);

    match runtime.delegations.accept_delegation(id, expensive, &commitment) {
        Err(CoordinationError::ThresholdNotMet { reason }) => {
            println!("  Expensive specialist rejected: {}", reason);
        }
        other => println!("  Unexpected outcome for expensive specialist: {:?}", other),
    }

    runtime
        .delegations
        .accept_delegation(id, affordable, &commitment)?;
    println!("  Affordable specialist accepted and bound");

    let outcome = runtime
        .delegations
        .complete_delegation(id, affordable, &proof_with_quality(88), &inputs)?;

    match outcome {
        SettlementOutcome::Paid { receipt, amount } => {
            println!("  Settled: {} paid to delegate, receipt {}", amount, receipt.id);
        }
        SettlementOutcome::Refunded { reason } => {
            println!("  Refunded: {}", reason);
        }
    }

    let record = runtime
        .registry
        .agent(affordable)
        .ok_or_else(|| CoordinationError::UnknownEntity {
            kind: "agent".to_string(),
            id: affordable.to_string(),
        })?;
    println!(
        "  Delegate after settlement: stake {}, reputation {}",
        record.stake, record.reputation
    );
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use operon_contracts::delegation::DelegationStatus;

    #[test]
    fn over_budget_specialist_never_binds() {
        let runtime = wire();
        let delegator = register_specialist(&runtime, Architecture::Mamba, 40, 1_000).unwrap();
        let expensive = register_specialist(&runtime, Architecture::Rwkv, 150, 0).unwrap();

        let id = runtime
            .delegations
            .create_delegation(
                delegator,
                Architecture::Rwkv,
                "task",
                100,
                Utc::now() + Duration::hours(1),
                70,
                300,
            )
            .unwrap();

        let result = runtime.delegations.accept_delegation(id, expensive, "c");
        assert!(matches!(result, Err(CoordinationError::ThresholdNotMet { .. })));

        let contract = runtime.delegations.delegation(id).unwrap();
        assert_eq!(contract.status, DelegationStatus::Pending);
        assert_eq!(contract.delegate, None);
    }

    #[test]
    fn settlement_moves_stake_and_reputation_together() {
        let runtime = wire();
        let delegator = register_specialist(&runtime, Architecture::Mamba, 40, 1_000).unwrap();
        let affordable = register_specialist(&runtime, Architecture::Rwkv, 80, 0).unwrap();

        let id = runtime
            .delegations
            .create_delegation(
                delegator,
                Architecture::Rwkv,
                "task",
                100,
                Utc::now() + Duration::hours(1),
                70,
                300,
            )
            .unwrap();
        assert_eq!(runtime.registry.agent(delegator).unwrap().stake, 700);

        let inputs = [11u64, 13, 17];
        runtime
            .delegations
            .accept_delegation(id, affordable, &commit_public_inputs(&inputs))
            .unwrap();
        let outcome = runtime
            .delegations
            .complete_delegation(id, affordable, &proof_with_quality(88), &inputs)
            .unwrap();

        assert!(matches!(outcome, SettlementOutcome::Paid { amount: 300, .. }));
        let record = runtime.registry.agent(affordable).unwrap();
        assert_eq!(record.stake, 300);
        assert_eq!(record.reputation, 501);
        assert_eq!(
            runtime.delegations.delegation(id).unwrap().status,
            DelegationStatus::Completed
        );
    }

    #[test]
    fn failed_work_refunds_and_penalizes() {
        let runtime = wire();
        let delegator = register_specialist(&runtime, Architecture::Mamba, 40, 1_000).unwrap();
        let affordable = register_specialist(&runtime, Architecture::Rwkv, 80, 0).unwrap();

        let id = runtime
            .delegations
            .create_delegation(
                delegator,
                Architecture::Rwkv,
                "task",
                100,
                Utc::now() + Duration::hours(1),
                70,
                300,
            )
            .unwrap();

        let inputs = [11u64];
        runtime
            .delegations
            .accept_delegation(id, affordable, &commit_public_inputs(&inputs))
            .unwrap();

        // Quality 40 is below the threshold of 70.
        let outcome = runtime
            .delegations
            .complete_delegation(id, affordable, &proof_with_quality(40), &inputs)
            .unwrap();

        assert!(matches!(outcome, SettlementOutcome::Refunded { .. }));
        assert_eq!(runtime.registry.agent(delegator).unwrap().stake, 1_000);
        assert_eq!(runtime.registry.agent(affordable).unwrap().reputation, 498);
    }

    #[test]
    fn demo_run_succeeds() {
        run_scenario().unwrap();
    }
}
