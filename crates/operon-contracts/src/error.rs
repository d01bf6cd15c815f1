//! The unified error taxonomy for the Operon runtime.
//!
//! Every fallible coordination operation returns `CoordinationResult<T>`.
//! None of these variants are process-fatal: each is a per-request outcome
//! the caller may retry or abandon. Rejections never leave partial writes
//! behind.

use thiserror::Error;

/// The unified error type for the Operon coordination runtime.
#[derive(Debug, Error)]
pub enum CoordinationError {
    /// The agent lacks the capability or score required for the action.
    #[error("authorization failed: {reason}")]
    Authorization { reason: String },

    /// The external verifier rejected the submitted proof.
    #[error("proof verification failed: {reason}")]
    VerificationFailure { reason: String },

    /// A step was submitted before all of its prerequisites completed.
    #[error("step {step} has incomplete prerequisites: {missing:?}")]
    DependencyNotSatisfied { step: usize, missing: Vec<usize> },

    /// The entity's deadline has passed. Checked lazily, on interaction.
    #[error("deadline exceeded at {deadline}")]
    DeadlineExceeded { deadline: chrono::DateTime<chrono::Utc> },

    /// A reclaim was attempted before the entity's deadline passed.
    #[error("deadline {deadline} has not been reached")]
    DeadlineNotReached { deadline: chrono::DateTime<chrono::Utc> },

    /// A quality or cost threshold was not met by an otherwise valid proof.
    #[error("threshold not met: {reason}")]
    ThresholdNotMet { reason: String },

    /// Replay of an already-recorded submission, or double-completion.
    #[error("duplicate submission: {reason}")]
    DuplicateSubmission { reason: String },

    /// A creation-time shape error. Nothing is created when this is raised.
    #[error("malformed specification: {reason}")]
    MalformedSpecification { reason: String },

    /// Mutation attempted on an entity already in a terminal state.
    #[error("entity is already terminal: {reason}")]
    AlreadyTerminal { reason: String },

    /// The gateway has no verifier registered for the architecture.
    ///
    /// Distinct from `VerificationFailure` so callers can tell
    /// "proof rejected" from "misrouted request."
    #[error("no verifier registered for architecture '{architecture}'")]
    UnsupportedArchitecture { architecture: String },

    /// A referenced entity does not exist in its store.
    #[error("unknown {kind} '{id}'")]
    UnknownEntity { kind: String, id: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A stake withdrawal exceeds the agent's balance. The record is left
    /// untouched.
    #[error("insufficient stake: required {required}, available {available}")]
    InsufficientStake { required: u64, available: u64 },

    /// An internal store lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}

/// Convenience alias used throughout the Operon crates.
pub type CoordinationResult<T> = Result<T, CoordinationError>;
