//! The operad orchestrator: the top-level workflow state machine.
//!
//! Per operad the lifecycle is **Initiated** → **InProgress** (first step
//! completion) → **Completed** (terminal). Every submission runs the same
//! ordered gate sequence:
//!
//!   Terminal → Deadline → Duplicate → Dependencies → Authorization →
//!   Gateway → Thresholds → [mint receipt] → mutate state → emit event
//!
//! No gate mutates anything on rejection; the first mutation happens only
//! after the receipt has been minted. Submissions to the same operad are
//! linearized by a per-operad mutex — the dependency gate is a
//! check-then-act sequence that is unsafe to interleave — while independent
//! operads proceed in parallel with no shared mutable state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use operon_contracts::{
    agent::AgentId,
    error::{CoordinationError, CoordinationResult},
    event::CoordinationEvent,
    operad::{ExecutionState, OperadId, OperadSpecification, OperadStatus},
    receipt::ComputationReceipt,
};

use crate::traits::{AgentDirectory, EventSink, ReceiptLedger, VerificationGateway};

/// Hard cap on the number of step completions one batched call may carry.
/// Bounds per-call cost; larger workloads split into multiple calls.
pub const MAX_BATCH_STEPS: usize = 5;

/// One step completion within a batched submission.
#[derive(Debug, Clone)]
pub struct StepSubmission {
    pub step_index: usize,
    pub proof: Vec<u8>,
    pub public_inputs: Vec<u64>,
    pub agent: AgentId,
}

/// Commitment to a public-input vector: SHA-256 over the little-endian
/// encoding of each element, in order.
pub fn commit_public_inputs(public_inputs: &[u64]) -> String {
    let mut hasher = Sha256::new();
    for input in public_inputs {
        hasher.update(input.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

/// The central coordinator driving every operad execution.
///
/// Exclusive owner of all `ExecutionState`: nothing else in the runtime
/// writes it. The trusted components it consults are held as trait objects,
/// so each is replaceable and unit-testable in isolation.
pub struct Orchestrator {
    gateway: Arc<dyn VerificationGateway>,
    ledger: Arc<dyn ReceiptLedger>,
    directory: Arc<dyn AgentDirectory>,
    events: Arc<dyn EventSink>,
    executions: RwLock<HashMap<OperadId, Arc<Mutex<ExecutionState>>>>,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<dyn VerificationGateway>,
        ledger: Arc<dyn ReceiptLedger>,
        directory: Arc<dyn AgentDirectory>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            directory,
            events,
            executions: RwLock::new(HashMap::new()),
        }
    }

    /// Validate `spec` and create execution state for it.
    ///
    /// All shape checks — including acyclicity of the dependency graph and
    /// a strictly-future deadline — run here, before any state exists.
    /// A rejected spec creates nothing.
    pub fn initiate_operad(&self, spec: OperadSpecification) -> CoordinationResult<OperadId> {
        spec.validate()?;

        if spec.deadline <= Utc::now() {
            return Err(CoordinationError::MalformedSpecification {
                reason: format!("deadline {} is not in the future", spec.deadline),
            });
        }

        let operad_id = OperadId::new();
        let state = ExecutionState::new(operad_id, spec);

        info!(
            operad = %operad_id,
            steps = state.spec.steps.len(),
            composition = ?state.spec.composition_type,
            "operad initiated"
        );

        self.executions
            .write()
            .map_err(|e| CoordinationError::LockPoisoned {
                reason: format!("execution store: {}", e),
            })?
            .insert(operad_id, Arc::new(Mutex::new(state)));

        Ok(operad_id)
    }

    /// Submit a proof for one step of an operad.
    ///
    /// Runs the full gate sequence; on success the minted receipt is
    /// returned and a `StepCompleted` event emitted. Completing the last
    /// step additionally seals the operad: the deterministic final receipt
    /// is computed exactly once and `OperadCompleted` emitted.
    pub fn submit_step(
        &self,
        operad: OperadId,
        step_index: usize,
        proof: &[u8],
        public_inputs: &[u64],
        agent: AgentId,
    ) -> CoordinationResult<ComputationReceipt> {
        let slot = self.execution_slot(operad)?;
        let mut state = slot.lock().map_err(|e| CoordinationError::LockPoisoned {
            reason: format!("operad {}: {}", operad, e),
        })?;

        self.submit_step_locked(&mut state, step_index, proof, public_inputs, agent)
    }

    /// Submit up to `MAX_BATCH_STEPS` step completions in one call.
    ///
    /// Each member runs the full gate sequence independently and commits
    /// atomically; one member's rejection never rolls back another's
    /// already-committed success. The outcomes are returned in submission
    /// order.
    pub fn submit_step_batch(
        &self,
        operad: OperadId,
        submissions: Vec<StepSubmission>,
    ) -> CoordinationResult<Vec<CoordinationResult<ComputationReceipt>>> {
        if submissions.len() > MAX_BATCH_STEPS {
            return Err(CoordinationError::MalformedSpecification {
                reason: format!(
                    "batch of {} exceeds the cap of {}",
                    submissions.len(),
                    MAX_BATCH_STEPS
                ),
            });
        }

        let slot = self.execution_slot(operad)?;
        let mut state = slot.lock().map_err(|e| CoordinationError::LockPoisoned {
            reason: format!("operad {}: {}", operad, e),
        })?;

        let outcomes = submissions
            .into_iter()
            .map(|s| {
                self.submit_step_locked(
                    &mut state,
                    s.step_index,
                    &s.proof,
                    &s.public_inputs,
                    s.agent,
                )
            })
            .collect();

        Ok(outcomes)
    }

    /// Read-only snapshot of an operad's execution state.
    pub fn execution_state(&self, operad: OperadId) -> Option<ExecutionState> {
        let executions = self.executions.read().ok()?;
        let slot = executions.get(&operad)?;
        slot.lock().ok().map(|state| state.clone())
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    fn execution_slot(&self, operad: OperadId) -> CoordinationResult<Arc<Mutex<ExecutionState>>> {
        self.executions
            .read()
            .map_err(|e| CoordinationError::LockPoisoned {
                reason: format!("execution store: {}", e),
            })?
            .get(&operad)
            .cloned()
            .ok_or_else(|| CoordinationError::UnknownEntity {
                kind: "operad".to_string(),
                id: operad.to_string(),
            })
    }

    /// The gate sequence, run under the per-operad lock.
    fn submit_step_locked(
        &self,
        state: &mut ExecutionState,
        step_index: usize,
        proof: &[u8],
        public_inputs: &[u64],
        agent: AgentId,
    ) -> CoordinationResult<ComputationReceipt> {
        let operad = state.operad_id;

        // ── Gate 1: terminal check ───────────────────────────────────────────
        if state.status == OperadStatus::Completed {
            return Err(CoordinationError::AlreadyTerminal {
                reason: format!("operad {} is completed", operad),
            });
        }

        // ── Gate 2: lazy deadline check ──────────────────────────────────────
        if Utc::now() > state.spec.deadline {
            return Err(CoordinationError::DeadlineExceeded {
                deadline: state.spec.deadline,
            });
        }

        let Some(step_spec) = state.spec.steps.get(step_index) else {
            return Err(CoordinationError::UnknownEntity {
                kind: "step".to_string(),
                id: format!("{}/{}", operad, step_index),
            });
        };
        let step_spec = step_spec.clone();

        // ── Gate 3: no double-completion ─────────────────────────────────────
        if state.step_completed[step_index] {
            return Err(CoordinationError::DuplicateSubmission {
                reason: format!("step {} of operad {} is already complete", step_index, operad),
            });
        }

        // ── Gate 4: dependency gate ──────────────────────────────────────────
        let missing: Vec<usize> = state.spec.dependencies[step_index]
            .iter()
            .copied()
            .filter(|&dep| !state.step_completed[dep])
            .collect();
        if !missing.is_empty() {
            debug!(
                operad = %operad,
                step = step_index,
                missing = ?missing,
                "step rejected: prerequisites incomplete"
            );
            return Err(CoordinationError::DependencyNotSatisfied {
                step: step_index,
                missing,
            });
        }

        // ── Gate 5: authorization ────────────────────────────────────────────
        let architecture = step_spec.required_architecture;
        if !self.directory.is_authorized(agent, architecture) {
            warn!(
                operad = %operad,
                step = step_index,
                agent = %agent,
                architecture = %architecture,
                "step rejected: agent not authorized"
            );
            return Err(CoordinationError::Authorization {
                reason: format!(
                    "agent {} is not authorized for architecture {}",
                    agent, architecture
                ),
            });
        }

        // ── Gate 6: external verification ────────────────────────────────────
        let outcome = self.gateway.validate(architecture, proof, public_inputs)?;
        if !outcome.valid {
            return Err(CoordinationError::VerificationFailure {
                reason: format!(
                    "verifier rejected proof for step {} of operad {}",
                    step_index, operad
                ),
            });
        }

        // ── Gate 7: quality and cost thresholds ──────────────────────────────
        if outcome.quality_score < step_spec.quality_threshold {
            return Err(CoordinationError::ThresholdNotMet {
                reason: format!(
                    "quality {} below threshold {} for step {}",
                    outcome.quality_score, step_spec.quality_threshold, step_index
                ),
            });
        }
        if outcome.cost_used > step_spec.cost_budget {
            return Err(CoordinationError::ThresholdNotMet {
                reason: format!(
                    "cost {} exceeds budget {} for step {}",
                    outcome.cost_used, step_spec.cost_budget, step_index
                ),
            });
        }

        // ── Mint the receipt, chained to the step's logical predecessor ──────
        //
        // The predecessor is the receipt of the highest-index prerequisite;
        // a step with no prerequisites chains to genesis. All prerequisites
        // are complete at this point, so the lookup cannot miss.
        let previous = state.spec.dependencies[step_index]
            .iter()
            .max()
            .and_then(|&dep| state.step_receipts[dep].clone());

        let commitment = commit_public_inputs(public_inputs);
        let receipt = self.ledger.create_receipt(
            &outcome,
            previous.as_ref(),
            agent,
            architecture,
            &commitment,
        )?;

        // ── Commit: the only mutations in the whole sequence ─────────────────
        state.step_receipts[step_index] = Some(receipt.id.clone());
        state.step_completed[step_index] = true;
        state.completed_count += 1;
        state.total_cost += outcome.cost_used;
        state.total_quality += u64::from(outcome.quality_score);
        if state.status == OperadStatus::Initiated {
            state.status = OperadStatus::InProgress;
        }

        info!(
            operad = %operad,
            step = step_index,
            agent = %agent,
            receipt = %receipt.id,
            quality = outcome.quality_score,
            cost = outcome.cost_used,
            "step completed"
        );

        self.events.emit(CoordinationEvent::StepCompleted {
            operad,
            step: step_index,
            agent,
            receipt: receipt.id.clone(),
            cost_used: outcome.cost_used,
            quality_score: outcome.quality_score,
        });

        if state.completed_count == state.spec.steps.len() {
            self.seal(state);
        }

        Ok(receipt)
    }

    /// Compute the final receipt and mark the operad terminal.
    ///
    /// Only called when every step is complete, so every receipt slot is
    /// populated. The final receipt commits to all step receipts in step
    /// order plus the aggregate metrics, making it deterministic for a
    /// given execution history.
    fn seal(&self, state: &mut ExecutionState) {
        let mut hasher = Sha256::new();
        for receipt in state.step_receipts.iter().flatten() {
            hasher.update(receipt.0.as_bytes());
        }
        hasher.update(state.total_cost.to_le_bytes());
        hasher.update(state.total_quality.to_le_bytes());
        let final_receipt = hex::encode(hasher.finalize());

        state.final_receipt = Some(final_receipt.clone());
        state.status = OperadStatus::Completed;

        let average_quality = (state.total_quality / state.spec.steps.len() as u64) as u32;

        info!(
            operad = %state.operad_id,
            final_receipt = %final_receipt,
            total_cost = state.total_cost,
            average_quality,
            "operad completed"
        );

        self.events.emit(CoordinationEvent::OperadCompleted {
            operad: state.operad_id,
            final_receipt,
            total_cost: state.total_cost,
            average_quality,
        });
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
