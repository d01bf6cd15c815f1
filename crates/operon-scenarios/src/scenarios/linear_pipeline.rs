//! Scenario 1: Linear Pipeline
//!
//! A three-step sequential operad spanning all three architectures. Each
//! step's receipt chains to its predecessor's, and completing the last step
//! seals the operad with a deterministic final receipt.
//!
//! Walk-through for the demo run:
//!   1. Three specialists register, one per architecture
//!   2. A sequential operad is initiated: RWKV → Mamba → xLSTM
//!   3. Each step's proof passes verification and mints a chained receipt
//!   4. The last step seals the operad: final receipt, totals, event
//!   5. Receipt chain integrity is verified back to genesis

use operon_contracts::{
    agent::Architecture,
    error::CoordinationResult,
    operad::CompositionType,
};
use operon_core::traits::ReceiptLedger;

use crate::backends::proof_with_quality;
use crate::scenarios::{operad, register_specialist, step, wire};

/// Run Scenario 1: Linear Pipeline.
pub fn run_scenario() -> CoordinationResult<()> {
    println!("=== Scenario 1: Linear Pipeline ===");
    println!();

    let runtime = wire();

    let rwkv = register_specialist(&runtime, Architecture::Rwkv, 20, 0)?;
    let mamba = register_specialist(&runtime, Architecture::Mamba, 30, 0)?;
    let xlstm = register_specialist(&runtime, Architecture::Xlstm, 50, 0)?;

    let spec = operad(
        CompositionType::Sequential,
        vec![
            step(Architecture::Rwkv, 60, 100),
            step(Architecture::Mamba, 60, 100),
            step(Architecture::Xlstm, 60, 100),
        ],
        vec![vec![], vec![0], vec![1]],
    );
    let id = runtime.orchestrator.initiate_operad(spec)?;
    println!("  Operad initiated: {} (3 sequential steps)", id);

    let inputs = [3u64, 1, 4];
    let first = runtime
        .orchestrator
        .submit_step(id, 0, &proof_with_quality(90), &inputs, rwkv)?;
    let second = runtime
        .orchestrator
        .submit_step(id, 1, &proof_with_quality(85), &inputs, mamba)?;
    let third = runtime
        .orchestrator
        .submit_step(id, 2, &proof_with_quality(95), &inputs, xlstm)?;

    println!("  Step 0 (RWKV):  receipt {} ← genesis", first.id);
    println!("  Step 1 (Mamba): receipt {} ← step 0", second.id);
    println!("  Step 2 (xLSTM): receipt {} ← step 1", third.id);

    let state = runtime
        .orchestrator
        .execution_state(id)
        .ok_or_else(|| operon_contracts::error::CoordinationError::UnknownEntity {
            kind: "operad".to_string(),
            id: id.to_string(),
        })?;

    println!();
    println!("  Status:          {:?}", state.status);
    println!(
        "  Final receipt:   {}",
        state.final_receipt.as_deref().unwrap_or("<none>")
    );
    println!("  Total cost:      {}", state.total_cost);
    println!(
        "  Chain integrity: {}",
        if runtime.ledger.verify_chain(&third.id) {
            "VERIFIED"
        } else {
            "FAILED"
        }
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
