//! Simulated proof backends for the Operon reference runtime.
//!
//! Each backend stands in for a real architecture-specific verifier binary.
//! They are deterministic, side-effect free, and share one proof encoding so
//! scenarios can dial in outcomes:
//!
//! - byte 0 is the quality score the verifier reports (0..=100); anything
//!   above 100 makes the proof invalid
//! - the remaining bytes are opaque padding
//! - an empty proof is invalid
//!
//! Cost is per-element over the public inputs, with a per-architecture rate
//! reflecting the relative expense of each verification procedure.

use operon_contracts::{
    agent::VerificationOutcome,
    error::CoordinationResult,
};
use operon_gateway::ProofBackend;

/// Highest quality score a simulated verifier will report.
pub const MAX_QUALITY: u8 = 100;

/// Build a proof blob the simulated backends will accept with the given
/// quality score.
pub fn proof_with_quality(quality: u8) -> Vec<u8> {
    vec![quality, 0x0f, 0x5e]
}

/// Build a proof blob every simulated backend rejects.
pub fn invalid_proof() -> Vec<u8> {
    vec![MAX_QUALITY + 1]
}

fn decode(proof: &[u8], public_inputs: &[u64], rate: u64) -> VerificationOutcome {
    let valid = proof.first().is_some_and(|&q| q <= MAX_QUALITY);
    VerificationOutcome {
        valid,
        quality_score: proof.first().copied().unwrap_or(0) as u32,
        cost_used: public_inputs.len() as u64 * rate,
    }
}

// ── RWKV ──────────────────────────────────────────────────────────────────────

/// Simulated RWKV verifier: replays the recurrent state update over the
/// public inputs. Cheapest of the three procedures.
pub struct RecurrentStateBackend;

impl ProofBackend for RecurrentStateBackend {
    fn validate(
        &self,
        proof: &[u8],
        public_inputs: &[u64],
    ) -> CoordinationResult<VerificationOutcome> {
        Ok(decode(proof, public_inputs, 6))
    }
}

// ── Mamba ─────────────────────────────────────────────────────────────────────

/// Simulated Mamba verifier: re-runs the selective-scan recurrence.
pub struct SelectiveScanBackend;

impl ProofBackend for SelectiveScanBackend {
    fn validate(
        &self,
        proof: &[u8],
        public_inputs: &[u64],
    ) -> CoordinationResult<VerificationOutcome> {
        Ok(decode(proof, public_inputs, 8))
    }
}

// ── xLSTM ─────────────────────────────────────────────────────────────────────

/// Simulated xLSTM verifier: checks the matrix-memory gate trace. The most
/// expensive procedure per input element.
pub struct MatrixMemoryBackend;

impl ProofBackend for MatrixMemoryBackend {
    fn validate(
        &self,
        proof: &[u8],
        public_inputs: &[u64],
    ) -> CoordinationResult<VerificationOutcome> {
        Ok(decode(proof, public_inputs, 12))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
