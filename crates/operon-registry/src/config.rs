//! Registry configuration schema.
//!
//! A `RegistryConfig` holds the score bounds and thresholds, deserialized
//! from TOML at startup or taken from `Default`. The +1/−2 reputation
//! deltas are not configurable; they live as fixed constants in the
//! registry implementation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use operon_contracts::error::{CoordinationError, CoordinationResult};

/// Score bounds and thresholds for the agent registry.
///
/// Example:
/// ```toml
/// max_reputation = 1000
/// initial_reputation = 500
/// min_specialization = 100
/// initial_specialization = 100
/// initial_trust = 100
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Upper bound for reputation, specialization, and trust scores.
    pub max_reputation: u32,
    /// Score a freshly registered agent starts with.
    pub initial_reputation: u32,
    /// Minimum specialization score required for authorization.
    pub min_specialization: u32,
    /// Specialization seeded at registration for declared architectures.
    /// Defaults to exactly the authorization minimum: a fresh agent may do
    /// what it declared, nothing more.
    pub initial_specialization: u32,
    /// Trust seeded the first time a pair of agents interacts.
    pub initial_trust: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_reputation: 1_000,
            initial_reputation: 500,
            min_specialization: 100,
            initial_specialization: 100,
            initial_trust: 100,
        }
    }
}

impl RegistryConfig {
    /// Parse `s` as TOML. Missing keys fall back to defaults.
    pub fn from_toml_str(s: &str) -> CoordinationResult<Self> {
        let config: RegistryConfig = toml::from_str(s).map_err(|e| CoordinationError::Config {
            reason: format!("failed to parse registry TOML: {}", e),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as registry configuration.
    pub fn from_file(path: &Path) -> CoordinationResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CoordinationError::Config {
            reason: format!("failed to read registry config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn check(&self) -> CoordinationResult<()> {
        if self.initial_reputation > self.max_reputation
            || self.initial_specialization > self.max_reputation
            || self.initial_trust > self.max_reputation
        {
            return Err(CoordinationError::Config {
                reason: "initial scores must not exceed max_reputation".to_string(),
            });
        }
        Ok(())
    }
}
