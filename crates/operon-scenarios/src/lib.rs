//! # operon-scenarios
//!
//! Reference runtime for the Operon coordination system.
//!
//! Demonstrates five end-to-end scenarios using simulated proof backends:
//!
//! 1. **Linear Pipeline** — a three-step sequential operad across all three
//!    architectures, with chained receipts and a deterministic final receipt.
//! 2. **DAG Workflow** — a fan-in dependency graph enforcing submission
//!    order, regardless of the order steps actually arrive in.
//! 3. **Escrowed Delegation** — stake escrow, cost-based acceptor
//!    eligibility, and atomic settlement on verified work.
//! 4. **Reputation Lifecycle** — the asymmetric score rule driving
//!    authorization loss and slow recovery.
//! 5. **Tamper and Replay Audit** — content-addressed receipts rejecting
//!    resubmission and exposing record tampering.
//!
//! All proof backends are simulated and deterministic. No real verifier
//! binaries are invoked.

pub mod backends;
pub mod scenarios;
