//! Scenario 4: Reputation Lifecycle
//!
//! The asymmetric score rule in action: one failed settlement costs twice
//! what a success earns, so an agent that fails drops below the
//! authorization floor immediately and needs two clean settlements to claw
//! its way back.
//!
//! Walk-through for the demo run:
//!   1. A fresh RWKV specialist sits exactly at the authorization floor
//!   2. One failed delegation: reputation −2, specialization −2, floor lost
//!   3. The orchestrator now rejects the agent's step submissions
//!   4. Two verified successes restore the floor and the authorization

use chrono::{Duration, Utc};

use operon_contracts::{
    agent::Architecture,
    error::{CoordinationError, CoordinationResult},
    operad::CompositionType,
};
use operon_core::orchestrator::commit_public_inputs;
use operon_core::traits::AgentDirectory;

use crate::backends::proof_with_quality;
use crate::scenarios::{operad, register_specialist, step, wire};

/// Run Scenario 4: Reputation Lifecycle.
pub fn run_scenario() -> CoordinationResult<()> {
    println!("=== Scenario 4: Reputation Lifecycle ===");
    println!();

    let runtime = wire();

    let delegator = register_specialist(&runtime, Architecture::Mamba, 40, 1_000)?;
    let specialist = register_specialist(&runtime, Architecture::Rwkv, 80, 0)?;

    let before = runtime
        .registry
        .agent(specialist)
        .ok_or_else(|| CoordinationError::UnknownEntity {
            kind: "agent".to_string(),
            id: specialist.to_string(),
        })?;
    println!(
        "  Fresh specialist: reputation {}, RWKV specialization {:?}",
        before.reputation,
        before.specialization.get(&Architecture::Rwkv)
    );

    // One failed delegation.
    let id = runtime.delegations.create_delegation(
        delegator,
        Architecture::Rwkv,
        "task",
        100,
        Utc::now() + Duration::hours(1),
        70,
        200,
    )?;
    let inputs = [5u64];
    runtime
        .delegations
        .accept_delegation(id, specialist, &commit_public_inputs(&inputs))?;
    runtime
        .delegations
        .complete_delegation(id, specialist, &proof_with_quality(20), &inputs)?;

    let after = runtime
        .registry
        .agent(specialist)
        .ok_or_else(|| CoordinationError::UnknownEntity {
            kind: "agent".to_string(),
            id: specialist.to_string(),
        })?;
    println!(
        "  After one failure: reputation {}, RWKV specialization {:?}",
        after.reputation,
        after.specialization.get(&Architecture::Rwkv)
    );
    println!(
        "  Authorized for RWKV: {}",
        runtime.registry.is_authorized(specialist, Architecture::Rwkv)
    );

    // The orchestrator enforces the loss.
    let op = runtime.orchestrator.initiate_operad(operad(
        CompositionType::Sequential,
        vec![step(Architecture::Rwkv, 50, 100)],
        vec![vec![]],
    ))?;
    match runtime
        .orchestrator
        .submit_step(op, 0, &proof_with_quality(90), &inputs, specialist)
    {
        Err(CoordinationError::Authorization { reason }) => {
            println!("  Step rejected: {}", reason);
        }
        other => println!("  Unexpected outcome: {:?}", other.map(|r| r.id)),
    }

    // Two verified successes, recorded by the settlement path, restore it.
    runtime
        .registry
        .update_specialization(specialist, Architecture::Rwkv, true)?;
    runtime.registry.update_reputation(specialist, true)?;
    runtime
        .registry
        .update_specialization(specialist, Architecture::Rwkv, true)?;
    runtime.registry.update_reputation(specialist, true)?;

    println!(
        "  After two successes: authorized for RWKV: {}",
        runtime.registry.is_authorized(specialist, Architecture::Rwkv)
    );
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
