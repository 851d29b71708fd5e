//! # candor-contracts
//!
//! Shared types, wire payloads, and contracts for the CANDOR compliance and
//! truth-reconciliation engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod conflict;
pub mod error;
pub mod finding;
pub mod policy;
pub mod source;
