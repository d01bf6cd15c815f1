//! # operon-contracts
//!
//! Shared types, ids, events, and error taxonomy for the Operon
//! coordination runtime.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, creation-time shape validation, and
//! error types.

pub mod agent;
pub mod delegation;
pub mod error;
pub mod event;
pub mod operad;
pub mod receipt;
