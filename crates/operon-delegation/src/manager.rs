//! The delegation manager: escrowed single-task handoff between agents.
//!
//! A delegation moves through `Pending → Accepted → {Completed, Failed}`.
//! Stake is withdrawn from the delegator at creation and paid out exactly
//! once at settlement — to the delegate on verified, above-threshold work,
//! back to the delegator otherwise. There is no auction: the first
//! eligible acceptor wins, and later acceptors are rejected, not queued.
//!
//! Deadlines are checked lazily, on the next interaction with the
//! contract; there is no background scheduler. An expired contract rejects
//! completion, and `reclaim_expired` is the delegator's explicit path to
//! recover the escrowed stake.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use operon_contracts::{
    agent::{AgentId, Architecture},
    delegation::{DelegationContract, DelegationId, DelegationStatus},
    error::{CoordinationError, CoordinationResult},
    event::CoordinationEvent,
    receipt::ComputationReceipt,
};
use operon_core::orchestrator::commit_public_inputs;
use operon_core::traits::{AgentDirectory, EventSink, ReceiptLedger, VerificationGateway};

/// How a delegation settled. Callers pattern-match to learn which of the
/// two branches ran; exactly one ever does.
#[derive(Debug)]
pub enum SettlementOutcome {
    /// The work verified at or above the quality threshold. The escrowed
    /// stake was paid to the delegate.
    Paid {
        receipt: ComputationReceipt,
        amount: u64,
    },
    /// The work failed verification or missed the threshold. The escrowed
    /// stake was refunded to the delegator. A failed settlement is a
    /// normal terminal state, not an exceptional one.
    Refunded { reason: String },
}

/// The sole writer of delegation contracts.
pub struct DelegationManager {
    gateway: Arc<dyn VerificationGateway>,
    ledger: Arc<dyn ReceiptLedger>,
    directory: Arc<dyn AgentDirectory>,
    events: Arc<dyn EventSink>,
    delegations: Mutex<HashMap<DelegationId, DelegationContract>>,
}

impl DelegationManager {
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
            delegations: Mutex::new(HashMap::new()),
        }
    }

    /// Create a contract and escrow the delegator's stake.
    ///
    /// Atomic: either the stake is withdrawn and the full record exists, or
    /// nothing happens — an insufficient balance or a non-future deadline
    /// creates no contract.
    #[allow(clippy::too_many_arguments)]
    pub fn create_delegation(
        &self,
        delegator: AgentId,
        architecture: Architecture,
        task_spec_hash: &str,
        max_cost: u64,
        deadline: DateTime<Utc>,
        quality_threshold: u32,
        stake: u64,
    ) -> CoordinationResult<DelegationId> {
        if deadline <= Utc::now() {
            return Err(CoordinationError::DeadlineExceeded { deadline });
        }

        let mut delegations = self.lock_store()?;

        // Escrow before the record exists; a failed withdrawal leaves no trace.
        self.directory.withdraw_stake(delegator, stake)?;

        let id = DelegationId::new();
        let contract = DelegationContract {
            id,
            delegator,
            delegate: None,
            architecture,
            task_spec_hash: task_spec_hash.to_string(),
            max_cost,
            deadline,
            quality_threshold,
            stake,
            output_commitment: None,
            status: DelegationStatus::Pending,
            created_at: Utc::now(),
        };
        delegations.insert(id, contract);

        info!(
            delegation = %id,
            delegator = %delegator,
            architecture = %architecture,
            stake,
            max_cost,
            "delegation created, stake escrowed"
        );

        self.events.emit(CoordinationEvent::DelegationCreated {
            delegation: id,
            delegator,
            architecture,
            stake,
        });

        Ok(id)
    }

    /// Bind the first eligible acceptor as the delegate.
    ///
    /// Eligibility: authorized for the contract's architecture, and a
    /// declared cost estimate within `max_cost`. Both are checked before
    /// `delegate` is ever bound; an over-budget acceptor never binds.
    pub fn accept_delegation(
        &self,
        id: DelegationId,
        agent: AgentId,
        output_commitment: &str,
    ) -> CoordinationResult<()> {
        let mut delegations = self.lock_store()?;
        let contract = Self::contract_mut(&mut delegations, id)?;

        if contract.status.is_terminal() {
            return Err(CoordinationError::AlreadyTerminal {
                reason: format!("delegation {} is settled", id),
            });
        }
        if contract.status == DelegationStatus::Accepted {
            return Err(CoordinationError::DuplicateSubmission {
                reason: format!("delegation {} already has a delegate", id),
            });
        }
        if Utc::now() > contract.deadline {
            return Err(CoordinationError::DeadlineExceeded {
                deadline: contract.deadline,
            });
        }

        if !self.directory.is_authorized(agent, contract.architecture) {
            return Err(CoordinationError::Authorization {
                reason: format!(
                    "agent {} is not authorized for architecture {}",
                    agent, contract.architecture
                ),
            });
        }

        match self.directory.cost_estimate(agent, contract.architecture) {
            Some(cost) if cost <= contract.max_cost => {}
            Some(cost) => {
                return Err(CoordinationError::ThresholdNotMet {
                    reason: format!(
                        "declared cost {} exceeds max_cost {}",
                        cost, contract.max_cost
                    ),
                });
            }
            None => {
                return Err(CoordinationError::Authorization {
                    reason: format!(
                        "agent {} declared no cost estimate for {}",
                        agent, contract.architecture
                    ),
                });
            }
        }

        contract.delegate = Some(agent);
        contract.output_commitment = Some(output_commitment.to_string());
        contract.status = DelegationStatus::Accepted;

        info!(delegation = %id, delegate = %agent, "delegation accepted");
        Ok(())
    }

    /// Settle an accepted delegation against the delegate's proof material.
    ///
    /// The proof must come from the bound delegate and its public inputs
    /// must match the output commitment bound at acceptance — otherwise the
    /// call is rejected without settling and may be retried. Once the
    /// gateway has spoken, exactly one branch runs: payment or refund.
    /// A second call on a settled contract is `AlreadyTerminal` with zero
    /// fund movement.
    pub fn complete_delegation(
        &self,
        id: DelegationId,
        agent: AgentId,
        proof: &[u8],
        public_inputs: &[u64],
    ) -> CoordinationResult<SettlementOutcome> {
        let mut delegations = self.lock_store()?;
        let contract = Self::contract_mut(&mut delegations, id)?;

        if contract.status.is_terminal() {
            return Err(CoordinationError::AlreadyTerminal {
                reason: format!("delegation {} is settled", id),
            });
        }
        if contract.status != DelegationStatus::Accepted {
            return Err(CoordinationError::Authorization {
                reason: format!("delegation {} has no bound delegate", id),
            });
        }
        if Utc::now() > contract.deadline {
            return Err(CoordinationError::DeadlineExceeded {
                deadline: contract.deadline,
            });
        }

        let delegate = contract.delegate.ok_or_else(|| CoordinationError::Authorization {
            reason: format!("delegation {} has no bound delegate", id),
        })?;
        if agent != delegate {
            return Err(CoordinationError::Authorization {
                reason: format!("agent {} is not the delegate of {}", agent, id),
            });
        }

        // The work must correspond to what the delegate committed to.
        let commitment = commit_public_inputs(public_inputs);
        if Some(commitment.as_str()) != contract.output_commitment.as_deref() {
            return Err(CoordinationError::VerificationFailure {
                reason: "public inputs do not match the committed output".to_string(),
            });
        }

        let outcome = self
            .gateway
            .validate(contract.architecture, proof, public_inputs)?;

        if outcome.valid && outcome.quality_score >= contract.quality_threshold {
            let receipt = self.ledger.create_receipt(
                &outcome,
                None,
                delegate,
                contract.architecture,
                &commitment,
            )?;

            self.directory.deposit_stake(delegate, contract.stake)?;
            self.record_settlement(contract.delegator, delegate, contract.architecture, true)?;
            contract.status = DelegationStatus::Completed;

            info!(
                delegation = %id,
                delegate = %delegate,
                amount = contract.stake,
                receipt = %receipt.id,
                "delegation completed, stake paid to delegate"
            );

            self.events.emit(CoordinationEvent::DelegationSettled {
                delegation: id,
                delegate,
                success: true,
                amount: contract.stake,
            });

            Ok(SettlementOutcome::Paid {
                receipt,
                amount: contract.stake,
            })
        } else {
            let reason = if outcome.valid {
                format!(
                    "quality {} below threshold {}",
                    outcome.quality_score, contract.quality_threshold
                )
            } else {
                "proof rejected by verifier".to_string()
            };

            self.directory.deposit_stake(contract.delegator, contract.stake)?;
            self.record_settlement(contract.delegator, delegate, contract.architecture, false)?;
            contract.status = DelegationStatus::Failed;

            warn!(
                delegation = %id,
                delegate = %delegate,
                reason = %reason,
                "delegation failed, stake refunded to delegator"
            );

            self.events.emit(CoordinationEvent::DelegationSettled {
                delegation: id,
                delegate,
                success: false,
                amount: contract.stake,
            });

            Ok(SettlementOutcome::Refunded { reason })
        }
    }

    /// The delegator's explicit path to recover escrowed stake after the
    /// deadline. A bound delegate that let the deadline lapse takes the
    /// standard failure penalty; an unbound contract penalizes nobody.
    pub fn reclaim_expired(&self, id: DelegationId, caller: AgentId) -> CoordinationResult<u64> {
        let mut delegations = self.lock_store()?;
        let contract = Self::contract_mut(&mut delegations, id)?;

        if contract.status.is_terminal() {
            return Err(CoordinationError::AlreadyTerminal {
                reason: format!("delegation {} is settled", id),
            });
        }
        if caller != contract.delegator {
            return Err(CoordinationError::Authorization {
                reason: format!("agent {} is not the delegator of {}", caller, id),
            });
        }
        if Utc::now() <= contract.deadline {
            return Err(CoordinationError::DeadlineNotReached {
                deadline: contract.deadline,
            });
        }

        if let Some(delegate) = contract.delegate {
            self.record_settlement(contract.delegator, delegate, contract.architecture, false)?;
        }

        self.directory.deposit_stake(contract.delegator, contract.stake)?;
        contract.status = DelegationStatus::Failed;

        info!(
            delegation = %id,
            delegator = %contract.delegator,
            amount = contract.stake,
            "expired delegation reclaimed"
        );

        self.events.emit(CoordinationEvent::StakeReclaimed {
            delegation: id,
            delegator: contract.delegator,
            amount: contract.stake,
        });

        Ok(contract.stake)
    }

    /// Read-only lookup. Never mutates state.
    pub fn delegation(&self, id: DelegationId) -> Option<DelegationContract> {
        self.delegations
            .lock()
            .expect("delegation store lock poisoned")
            .get(&id)
            .cloned()
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    fn lock_store(
        &self,
    ) -> CoordinationResult<std::sync::MutexGuard<'_, HashMap<DelegationId, DelegationContract>>>
    {
        self.delegations
            .lock()
            .map_err(|e| CoordinationError::LockPoisoned {
                reason: format!("delegation store: {}", e),
            })
    }

    fn contract_mut(
        delegations: &mut HashMap<DelegationId, DelegationContract>,
        id: DelegationId,
    ) -> CoordinationResult<&mut DelegationContract> {
        delegations
            .get_mut(&id)
            .ok_or_else(|| CoordinationError::UnknownEntity {
                kind: "delegation".to_string(),
                id: id.to_string(),
            })
    }

    /// Reputation, specialization, and pairwise trust updates for one
    /// settlement, plus the reputation event. This is the only routine that
    /// touches registry scores.
    fn record_settlement(
        &self,
        delegator: AgentId,
        delegate: AgentId,
        architecture: Architecture,
        success: bool,
    ) -> CoordinationResult<()> {
        let new_score = self.directory.update_reputation(delegate, success)?;
        self.directory
            .update_specialization(delegate, architecture, success)?;
        self.directory.update_trust(delegator, delegate, success)?;

        self.events.emit(CoordinationEvent::ReputationUpdated {
            agent: delegate,
            new_score,
            success,
        });
        Ok(())
    }
}
