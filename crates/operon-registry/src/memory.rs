//! In-memory implementation of `AgentDirectory`.
//!
//! Records live in a `HashMap` behind a `Mutex`. Every mutation goes
//! through this component — agents never touch their own records — and
//! records are never removed; `deactivate` flips a flag.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info};

use operon_contracts::{
    agent::{AgentId, AgentRecord, Architecture},
    error::{CoordinationError, CoordinationResult},
};
use operon_core::traits::AgentDirectory;

use crate::config::RegistryConfig;

/// Reputation gained on a successful settlement.
pub const SUCCESS_REWARD: u32 = 1;

/// Reputation lost on a failed settlement.
///
/// The 2:1 penalty:reward asymmetry is an anti-spam property: cheap
/// low-effort submissions are punished harder than correct work is
/// rewarded. The exact ratio is load-bearing; do not tune it.
pub const FAILURE_PENALTY: u32 = 2;

/// Apply the asymmetric update rule to one score.
fn bump(score: u32, success: bool, max: u32) -> u32 {
    if success {
        score.saturating_add(SUCCESS_REWARD).min(max)
    } else {
        score.saturating_sub(FAILURE_PENALTY)
    }
}

/// An in-memory agent registry.
pub struct InMemoryAgentRegistry {
    config: RegistryConfig,
    agents: Arc<Mutex<HashMap<AgentId, AgentRecord>>>,
}

impl InMemoryAgentRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            agents: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `f` against the mutable record for `agent`.
    fn with_record<T>(
        &self,
        agent: AgentId,
        f: impl FnOnce(&mut AgentRecord, &RegistryConfig) -> CoordinationResult<T>,
    ) -> CoordinationResult<T> {
        let mut agents = self.agents.lock().map_err(|e| CoordinationError::LockPoisoned {
            reason: format!("agent registry: {}", e),
        })?;
        let record = agents
            .get_mut(&agent)
            .ok_or_else(|| CoordinationError::UnknownEntity {
                kind: "agent".to_string(),
                id: agent.to_string(),
            })?;
        f(record, &self.config)
    }
}

impl AgentDirectory for InMemoryAgentRegistry {
    /// Create a record for a new agent.
    ///
    /// Specialization is seeded at the configured initial value for exactly
    /// the declared architectures, so a fresh agent is authorized for what
    /// it registered and nothing else.
    fn register_agent(
        &self,
        architectures: Vec<(Architecture, u64)>,
        stake: u64,
    ) -> CoordinationResult<AgentId> {
        if architectures.is_empty() {
            return Err(CoordinationError::MalformedSpecification {
                reason: "agent must declare at least one architecture".to_string(),
            });
        }

        let id = AgentId::new();
        let declared: HashSet<Architecture> = architectures.iter().map(|(a, _)| *a).collect();
        let cost_estimates: HashMap<Architecture, u64> = architectures.into_iter().collect();
        let specialization: HashMap<Architecture, u32> = declared
            .iter()
            .map(|&a| (a, self.config.initial_specialization))
            .collect();

        let record = AgentRecord {
            id,
            architectures: declared,
            cost_estimates,
            stake,
            reputation: self.config.initial_reputation,
            specialization,
            trust: HashMap::new(),
            active: true,
            registered_at: Utc::now(),
        };

        info!(
            agent = %id,
            architectures = record.architectures.len(),
            stake,
            reputation = record.reputation,
            "agent registered"
        );

        self.agents
            .lock()
            .map_err(|e| CoordinationError::LockPoisoned {
                reason: format!("agent registry: {}", e),
            })?
            .insert(id, record);

        Ok(id)
    }

    fn agent(&self, agent: AgentId) -> Option<AgentRecord> {
        self.agents
            .lock()
            .expect("agent registry lock poisoned")
            .get(&agent)
            .cloned()
    }

    /// Active AND declared AND specialization at or above the minimum.
    fn is_authorized(&self, agent: AgentId, architecture: Architecture) -> bool {
        let agents = self.agents.lock().expect("agent registry lock poisoned");
        let Some(record) = agents.get(&agent) else {
            return false;
        };
        record.active
            && record.architectures.contains(&architecture)
            && record
                .specialization
                .get(&architecture)
                .is_some_and(|&score| score >= self.config.min_specialization)
    }

    fn cost_estimate(&self, agent: AgentId, architecture: Architecture) -> Option<u64> {
        let agents = self.agents.lock().expect("agent registry lock poisoned");
        agents
            .get(&agent)
            .and_then(|record| record.cost_estimates.get(&architecture))
            .copied()
    }

    fn update_reputation(&self, agent: AgentId, success: bool) -> CoordinationResult<u32> {
        self.with_record(agent, |record, config| {
            record.reputation = bump(record.reputation, success, config.max_reputation);
            debug!(agent = %agent, success, reputation = record.reputation, "reputation updated");
            Ok(record.reputation)
        })
    }

    fn update_specialization(
        &self,
        agent: AgentId,
        architecture: Architecture,
        success: bool,
    ) -> CoordinationResult<u32> {
        self.with_record(agent, |record, config| {
            let score = record
                .specialization
                .entry(architecture)
                .or_insert(config.initial_specialization);
            *score = bump(*score, success, config.max_reputation);
            Ok(*score)
        })
    }

    fn update_trust(
        &self,
        of: AgentId,
        toward: AgentId,
        success: bool,
    ) -> CoordinationResult<u32> {
        self.with_record(of, |record, config| {
            let score = record.trust.entry(toward).or_insert(config.initial_trust);
            *score = bump(*score, success, config.max_reputation);
            Ok(*score)
        })
    }

    fn withdraw_stake(&self, agent: AgentId, amount: u64) -> CoordinationResult<()> {
        self.with_record(agent, |record, _| {
            if record.stake < amount {
                return Err(CoordinationError::InsufficientStake {
                    required: amount,
                    available: record.stake,
                });
            }
            record.stake -= amount;
            Ok(())
        })
    }

    fn deposit_stake(&self, agent: AgentId, amount: u64) -> CoordinationResult<()> {
        self.with_record(agent, |record, _| {
            record.stake = record.stake.saturating_add(amount);
            Ok(())
        })
    }

    fn deactivate(&self, agent: AgentId) -> CoordinationResult<()> {
        self.with_record(agent, |record, _| {
            record.active = false;
            info!(agent = %agent, "agent deactivated");
            Ok(())
        })
    }
}
