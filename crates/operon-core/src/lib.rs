//! # operon-core
//!
//! Trust-boundary traits and the operad orchestrator for the Operon
//! coordination runtime.
//!
//! This crate provides:
//! - The four core traits (`VerificationGateway`, `ReceiptLedger`,
//!   `AgentDirectory`, `EventSink`)
//! - The `Orchestrator` that drives multi-step operad executions
//! - `InMemoryEventLog`, the reference event sink

pub mod events;
pub mod orchestrator;
pub mod traits;

pub use events::InMemoryEventLog;
pub use orchestrator::{Orchestrator, StepSubmission, MAX_BATCH_STEPS};
