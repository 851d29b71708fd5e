//! Core trait definitions for the CANDOR engine.
//!
//! These three traits are the seams between the pipeline and its
//! implementations:
//!
//! - `PolicyStore`      : read access to the policy catalog
//! - `RuleEvaluator`    : applies a policy's rules to content
//! - `SourceClassifier` : labels a raw document with its source type
//!
//! Every implementation must be a pure function of its inputs plus
//! read-only shared state, so one instance can serve concurrent callers.

use std::sync::Arc;

use candor_contracts::{
    error::CandorResult,
    finding::Finding,
    policy::Policy,
    source::{SourceDocument, SourceType},
};

/// Read side of the policy catalog.
pub trait PolicyStore: Send + Sync {
    /// Look up a policy by id.
    ///
    /// Returns `CandorError::PolicyNotFound` for an unknown id.  Callers must
    /// turn that into a non-compliant result, never into an empty rule set.
    fn get_policy(&self, policy_id: &str) -> CandorResult<Arc<Policy>>;
}

/// Applies a policy's rules to a piece of content.
pub trait RuleEvaluator: Send + Sync {
    /// Scan `content` with every in-scope rule of `policy`.
    ///
    /// Total: a rule that cannot be compiled is reported as a warning
    /// finding, and empty content yields no findings.  Output is sorted by
    /// severity (highest first), then rule id.
    ///
    /// `language` only selects case-sensitivity for rules that ask for it.
    fn evaluate(&self, content: &str, policy: &Policy, language: Option<&str>) -> Vec<Finding>;
}

/// Labels a raw document with the kind of source it came from.
pub trait SourceClassifier: Send + Sync {
    /// Deterministic and side-effect free; always returns a type.
    fn classify(&self, doc: &SourceDocument) -> SourceType;
}
