//! # operon-gateway
//!
//! The uniform verification gateway: one `validate()` surface over
//! heterogeneous, architecture-specific proof verifiers.
//!
//! The gateway is the coordination core's only point of contact with the
//! proving subsystem. It is stateless and pure — replay protection belongs
//! to the receipt ledger, and proof bytes are never interpreted here.

pub mod gateway;

pub use gateway::{ArchitectureGateway, ProofBackend};
