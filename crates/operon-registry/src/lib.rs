//! # operon-registry
//!
//! Capability, stake, and reputation bookkeeping for Operon agents.
//!
//! Authorization is two-factor: an agent must have declared the
//! architecture at registration AND hold a specialization score at or above
//! the configured minimum — agents cannot claim untested capabilities.
//! Reputation obeys the asymmetric +1/−2 rule, clamped to
//! `[0, max_reputation]`.

pub mod config;
pub mod memory;

pub use config::RegistryConfig;
pub use memory::{InMemoryAgentRegistry, FAILURE_PENALTY, SUCCESS_REWARD};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use operon_contracts::{
        agent::{AgentId, Architecture},
        error::CoordinationError,
    };
    use operon_core::traits::AgentDirectory;

    use super::{InMemoryAgentRegistry, RegistryConfig};

    fn registry() -> InMemoryAgentRegistry {
        InMemoryAgentRegistry::new(RegistryConfig::default())
    }

    fn register(registry: &InMemoryAgentRegistry) -> AgentId {
        registry
            .register_agent(vec![(Architecture::Rwkv, 50), (Architecture::Mamba, 80)], 1_000)
            .unwrap()
    }

    // ── Registration and authorization ────────────────────────────────────────

    #[test]
    fn fresh_agent_is_authorized_for_declared_architectures_only() {
        let registry = registry();
        let agent = register(&registry);

        assert!(registry.is_authorized(agent, Architecture::Rwkv));
        assert!(registry.is_authorized(agent, Architecture::Mamba));
        assert!(!registry.is_authorized(agent, Architecture::Xlstm));
    }

    #[test]
    fn unknown_agent_is_never_authorized() {
        let registry = registry();
        assert!(!registry.is_authorized(AgentId::new(), Architecture::Rwkv));
    }

    #[test]
    fn registration_requires_at_least_one_architecture() {
        let registry = registry();
        let result = registry.register_agent(vec![], 100);
        assert!(matches!(
            result,
            Err(CoordinationError::MalformedSpecification { .. })
        ));
    }

    #[test]
    fn cost_estimates_are_recorded_per_architecture() {
        let registry = registry();
        let agent = register(&registry);

        assert_eq!(registry.cost_estimate(agent, Architecture::Rwkv), Some(50));
        assert_eq!(registry.cost_estimate(agent, Architecture::Mamba), Some(80));
        assert_eq!(registry.cost_estimate(agent, Architecture::Xlstm), None);
    }

    #[test]
    fn deactivation_blocks_authorization_but_keeps_the_record() {
        let registry = registry();
        let agent = register(&registry);

        registry.deactivate(agent).unwrap();
        assert!(!registry.is_authorized(agent, Architecture::Rwkv));
        assert!(registry.agent(agent).is_some(), "record must survive deactivation");
    }

    // ── Reputation ────────────────────────────────────────────────────────────

    #[test]
    fn reputation_rewards_one_and_penalizes_two() {
        let registry = registry();
        let agent = register(&registry);
        let initial = registry.agent(agent).unwrap().reputation;

        assert_eq!(registry.update_reputation(agent, true).unwrap(), initial + 1);
        assert_eq!(registry.update_reputation(agent, false).unwrap(), initial - 1);
    }

    #[test]
    fn reputation_is_capped_at_max() {
        let config = RegistryConfig {
            initial_reputation: 999,
            ..RegistryConfig::default()
        };
        let registry = InMemoryAgentRegistry::new(config);
        let agent = registry
            .register_agent(vec![(Architecture::Rwkv, 10)], 0)
            .unwrap();

        assert_eq!(registry.update_reputation(agent, true).unwrap(), 1_000);
        assert_eq!(registry.update_reputation(agent, true).unwrap(), 1_000);
    }

    #[test]
    fn reputation_is_floored_at_zero() {
        let config = RegistryConfig {
            initial_reputation: 3,
            ..RegistryConfig::default()
        };
        let registry = InMemoryAgentRegistry::new(config);
        let agent = registry
            .register_agent(vec![(Architecture::Rwkv, 10)], 0)
            .unwrap();

        assert_eq!(registry.update_reputation(agent, false).unwrap(), 1);
        assert_eq!(registry.update_reputation(agent, false).unwrap(), 0);
        assert_eq!(registry.update_reputation(agent, false).unwrap(), 0);
    }

    /// Arbitrary success/failure sequences never leave [0, max].
    #[test]
    fn reputation_stays_in_bounds_under_arbitrary_sequences() {
        let registry = registry();
        let agent = register(&registry);

        // A fixed pseudo-pattern mixing long failure and success runs.
        for round in 0u32..2_000 {
            let success = round % 7 < 2;
            let score = registry.update_reputation(agent, success).unwrap();
            assert!(score <= 1_000, "score {} escaped the cap", score);
        }
    }

    #[test]
    fn updating_unknown_agent_is_an_error() {
        let registry = registry();
        let result = registry.update_reputation(AgentId::new(), true);
        assert!(matches!(result, Err(CoordinationError::UnknownEntity { .. })));
    }

    // ── Specialization ────────────────────────────────────────────────────────

    #[test]
    fn failed_settlements_revoke_authorization_via_specialization() {
        let registry = registry();
        let agent = register(&registry);

        // Seeded exactly at the minimum: a single failure drops below it.
        registry
            .update_specialization(agent, Architecture::Rwkv, false)
            .unwrap();
        assert!(!registry.is_authorized(agent, Architecture::Rwkv));

        // Two successes claw it back.
        registry
            .update_specialization(agent, Architecture::Rwkv, true)
            .unwrap();
        registry
            .update_specialization(agent, Architecture::Rwkv, true)
            .unwrap();
        assert!(registry.is_authorized(agent, Architecture::Rwkv));
    }

    // ── Trust ─────────────────────────────────────────────────────────────────

    #[test]
    fn trust_is_seeded_on_first_interaction_then_bumped() {
        let registry = registry();
        let delegator = register(&registry);
        let delegate = register(&registry);

        let initial_trust = RegistryConfig::default().initial_trust;
        let after_success = registry.update_trust(delegator, delegate, true).unwrap();
        assert_eq!(after_success, initial_trust + 1);

        let after_failure = registry.update_trust(delegator, delegate, false).unwrap();
        assert_eq!(after_failure, initial_trust - 1);
    }

    // ── Stake ─────────────────────────────────────────────────────────────────

    #[test]
    fn stake_withdrawal_is_atomic() {
        let registry = registry();
        let agent = register(&registry);

        let result = registry.withdraw_stake(agent, 5_000);
        assert!(matches!(
            result,
            Err(CoordinationError::InsufficientStake { required: 5_000, available: 1_000 })
        ));
        assert_eq!(registry.agent(agent).unwrap().stake, 1_000, "balance untouched");

        registry.withdraw_stake(agent, 400).unwrap();
        registry.deposit_stake(agent, 100).unwrap();
        assert_eq!(registry.agent(agent).unwrap().stake, 700);
    }

    // ── Config ────────────────────────────────────────────────────────────────

    #[test]
    fn config_parses_from_toml_with_defaults() {
        let config = RegistryConfig::from_toml_str("max_reputation = 500\n").unwrap();
        assert_eq!(config.max_reputation, 500);
        assert_eq!(config.min_specialization, RegistryConfig::default().min_specialization);
    }

    #[test]
    fn config_rejects_initial_scores_above_max() {
        let result = RegistryConfig::from_toml_str("max_reputation = 10\ninitial_reputation = 50\n");
        assert!(matches!(result, Err(CoordinationError::Config { .. })));
    }
}
