//! Error types for the CANDOR compliance engine.
//!
//! Fallible operations return `CandorResult<T>`.  Only conditions a caller
//! must act on are errors; an empty document or a rule that fails to compile
//! is reported inside the result rather than as an `Err`.

use thiserror::Error;

/// The unified error type for the CANDOR crates.
#[derive(Debug, Error)]
pub enum CandorError {
    /// No policy is registered under the requested identifier.
    ///
    /// The validation pipeline converts this into a score-0, non-compliant
    /// result; it is never read as "no rules, therefore compliant".
    #[error("policy '{policy_id}' is not registered in the catalog")]
    PolicyNotFound { policy_id: String },

    /// A rule's pattern could not be compiled.
    ///
    /// The evaluator skips the rule and surfaces a warning finding instead.
    #[error("rule '{rule_id}' is malformed: {reason}")]
    MalformedRule { rule_id: String, reason: String },

    /// The caller passed an argument no computation can be defined for.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A configuration document is missing, unreadable, or out of range.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A rendered payload does not satisfy the published output schema.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the CANDOR crates.
pub type CandorResult<T> = Result<T, CandorError>;
