//! # operon-delegation
//!
//! Escrowed single-task handoff between agents, settled atomically on
//! verification outcome.
//!
//! Stake is locked when a delegation is created, the first eligible
//! acceptor binds itself as delegate, and settlement pays or refunds
//! exactly once — success rewards the delegate's reputation, failure
//! penalizes it, and both outcomes are normal terminal states.

pub mod manager;

pub use manager::{DelegationManager, SettlementOutcome};

// ── Tests ─────────────────────────────────────────────────────────────────────
