//! Scenario 2: DAG Workflow
//!
//! A four-step fan-in graph: steps 0 and 1 are independent, step 2 requires
//! both, step 3 requires step 2. The orchestrator enforces the dependency
//! gate regardless of arrival order — a premature submission is rejected
//! with the exact set of missing prerequisites and mutates nothing, so the
//! submitter can simply retry once they complete.
//!
//! Walk-through for the demo run:
//!   1. Step 2 is submitted first → rejected, missing [0, 1]
//!   2. Steps 0 and 1 complete (in a single batch)
//!   3. Step 2 retries and succeeds, chaining to step 1's receipt
//!   4. Step 3 completes and seals the operad

use operon_contracts::{
    agent::Architecture,
    error::{CoordinationError, CoordinationResult},
    operad::CompositionType,
};
use operon_core::StepSubmission;

use crate::backends::proof_with_quality;
use crate::scenarios::{operad, register_specialist, step, wire, Runtime};

/// The fan-in specification used throughout this scenario.
fn fan_in_spec() -> operon_contracts::operad::OperadSpecification {
    operad(
        CompositionType::Dag,
        vec![
            step(Architecture::Rwkv, 50, 200),
            step(Architecture::Mamba, 50, 200),
            step(Architecture::Rwkv, 50, 200),
            step(Architecture::Xlstm, 50, 200),
        ],
        vec![vec![], vec![], vec![0, 1], vec![2]],
    )
}

struct Crew {
    rwkv: operon_contracts::agent::AgentId,
    mamba: operon_contracts::agent::AgentId,
    xlstm: operon_contracts::agent::AgentId,
}

fn crew(runtime: &Runtime) -> CoordinationResult<Crew> {
    Ok(Crew {
        rwkv: register_specialist(runtime, Architecture::Rwkv, 20, 0)?,
        mamba: register_specialist(runtime, Architecture::Mamba, 30, 0)?,
        xlstm: register_specialist(runtime, Architecture::Xlstm, 50, 0)?,
    })
}

fn agent_for(crew: &Crew, step_index: usize) -> operon_contracts::agent::AgentId {
    match step_index {
        1 => crew.mamba,
        3 => crew.xlstm,
        _ => crew.rwkv,
    }
}

/// Run Scenario 2: DAG Workflow.
pub fn run_scenario() -> CoordinationResult<()> {
    println!("=== Scenario 2: DAG Workflow ===");
    println!();

    let runtime = wire();
    let crew = crew(&runtime)?;

    let id = runtime.orchestrator.initiate_operad(fan_in_spec())?;
    println!("  Operad initiated: {} (fan-in: 2 requires 0 and 1)", id);

    let inputs = [2u64, 7];

    // Premature submission of the join step.
    match runtime
        .orchestrator
        .submit_step(id, 2, &proof_with_quality(80), &inputs, crew.rwkv)
    {
        Err(CoordinationError::DependencyNotSatisfied { step, missing }) => {
            println!("  Step {} rejected early: missing prerequisites {:?}", step, missing);
        }
        other => {
            println!("  Unexpected outcome for premature step 2: {:?}", other.map(|r| r.id));
        }
    }

    // The two independent steps arrive as one batch.
    let outcomes = runtime.orchestrator.submit_step_batch(
        id,
        vec![
            StepSubmission {
                step_index: 0,
                proof: proof_with_quality(90),
                public_inputs: inputs.to_vec(),
                agent: crew.rwkv,
            },
            StepSubmission {
                step_index: 1,
                proof: proof_with_quality(85),
                public_inputs: inputs.to_vec(),
                agent: crew.mamba,
            },
        ],
    )?;
    println!(
        "  Batch of 2 independent steps: {} accepted",
        outcomes.iter().filter(|o| o.is_ok()).count()
    );

    let join = runtime
        .orchestrator
        .submit_step(id, 2, &proof_with_quality(80), &inputs, crew.rwkv)?;
    println!("  Step 2 retried: receipt {} ← step 1", join.id);

    let last = runtime
        .orchestrator
        .submit_step(id, 3, &proof_with_quality(75), &inputs, crew.xlstm)?;
    println!("  Step 3 completed: receipt {} ← step 2", last.id);

    let state = runtime.orchestrator.execution_state(id);
    println!();
    println!(
        "  Status: {:?}",
        state.map(|s| s.status)
    );
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
