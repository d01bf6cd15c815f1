//! Architecture-routed verification gateway.
//!
//! `ArchitectureGateway` implements the `VerificationGateway` trait from
//! `operon-core` by routing each request to the `ProofBackend` registered
//! for its architecture. Backends are registered at startup by the hosting
//! application — keeping architecture-specific proof systems out of the
//! coordination core is an Operon design principle.

use std::collections::HashMap;

use tracing::{debug, warn};

use operon_contracts::{
    agent::{Architecture, VerificationOutcome},
    error::{CoordinationError, CoordinationResult},
};
use operon_core::traits::VerificationGateway;

/// One architecture's external verifier.
///
/// Implementations must be deterministic — identical `(proof,
/// public_inputs)` always produce the same `valid` bit — and free of side
/// effects beyond resource metering. The proof is an opaque blob: the
/// gateway and everything above it never interpret it.
pub trait ProofBackend: Send + Sync {
    fn validate(&self, proof: &[u8], public_inputs: &[u64])
        -> CoordinationResult<VerificationOutcome>;
}

/// The uniform adapter over heterogeneous per-architecture verifiers.
///
/// Stateless: replay protection is the receipt ledger's job,
/// so the gateway holds nothing but its routing table.
#[derive(Default)]
pub struct ArchitectureGateway {
    backends: HashMap<Architecture, Box<dyn ProofBackend>>,
}

impl ArchitectureGateway {
    /// Create a gateway with no backends registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the verifier for `architecture`. Registering the same
    /// architecture twice replaces the previous backend.
    pub fn register_backend(&mut self, architecture: Architecture, backend: Box<dyn ProofBackend>) {
        self.backends.insert(architecture, backend);
    }

    /// True if a backend is registered for `architecture`.
    pub fn supports(&self, architecture: Architecture) -> bool {
        self.backends.contains_key(&architecture)
    }
}

impl VerificationGateway for ArchitectureGateway {
    /// Route `proof` to the backend registered for `architecture`.
    ///
    /// A missing route is `UnsupportedArchitecture`, never `valid = false`:
    /// callers must be able to tell a rejected proof from a misrouted
    /// request.
    fn validate(
        &self,
        architecture: Architecture,
        proof: &[u8],
        public_inputs: &[u64],
    ) -> CoordinationResult<VerificationOutcome> {
        let Some(backend) = self.backends.get(&architecture) else {
            warn!(architecture = %architecture, "no verifier registered");
            return Err(CoordinationError::UnsupportedArchitecture {
                architecture: architecture.to_string(),
            });
        };

        let outcome = backend.validate(proof, public_inputs)?;
        debug!(
            architecture = %architecture,
            valid = outcome.valid,
            quality = outcome.quality_score,
            cost = outcome.cost_used,
            "proof validated"
        );
        Ok(outcome)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use operon_contracts::{
        agent::{Architecture, VerificationOutcome},
        error::{CoordinationError, CoordinationResult},
    };
    use operon_core::traits::VerificationGateway;

    use super::{ArchitectureGateway, ProofBackend};

    /// A backend returning a fixed outcome, tagged so routing is observable.
    struct FixedBackend {
        quality: u32,
    }

    impl ProofBackend for FixedBackend {
        fn validate(
            &self,
            proof: &[u8],
            _public_inputs: &[u64],
        ) -> CoordinationResult<VerificationOutcome> {
            Ok(VerificationOutcome {
                valid: !proof.is_empty(),
                quality_score: self.quality,
                cost_used: proof.len() as u64,
            })
        }
    }

    #[test]
    fn routes_to_the_backend_for_the_architecture() {
        let mut gateway = ArchitectureGateway::new();
        gateway.register_backend(Architecture::Rwkv, Box::new(FixedBackend { quality: 11 }));
        gateway.register_backend(Architecture::Mamba, Box::new(FixedBackend { quality: 22 }));

        let rwkv = gateway.validate(Architecture::Rwkv, b"proof", &[]).unwrap();
        let mamba = gateway.validate(Architecture::Mamba, b"proof", &[]).unwrap();

        assert_eq!(rwkv.quality_score, 11);
        assert_eq!(mamba.quality_score, 22);
    }

    #[test]
    fn unsupported_architecture_is_an_error_not_a_rejection() {
        let gateway = ArchitectureGateway::new();
        let result = gateway.validate(Architecture::Xlstm, b"proof", &[]);

        match result {
            Err(CoordinationError::UnsupportedArchitecture { architecture }) => {
                assert_eq!(architecture, "xLSTM");
            }
            other => panic!("expected UnsupportedArchitecture, got {:?}", other),
        }
    }

    #[test]
    fn identical_inputs_yield_identical_outcomes() {
        let mut gateway = ArchitectureGateway::new();
        gateway.register_backend(Architecture::Rwkv, Box::new(FixedBackend { quality: 70 }));

        let first = gateway.validate(Architecture::Rwkv, b"same", &[1, 2]).unwrap();
        let second = gateway.validate(Architecture::Rwkv, b"same", &[1, 2]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reregistering_replaces_the_backend() {
        let mut gateway = ArchitectureGateway::new();
        gateway.register_backend(Architecture::Rwkv, Box::new(FixedBackend { quality: 1 }));
        gateway.register_backend(Architecture::Rwkv, Box::new(FixedBackend { quality: 2 }));

        let outcome = gateway.validate(Architecture::Rwkv, b"proof", &[]).unwrap();
        assert_eq!(outcome.quality_score, 2);
        assert!(gateway.supports(Architecture::Rwkv));
        assert!(!gateway.supports(Architecture::Mamba));
    }
}
