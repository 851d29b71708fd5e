//! The CANDOR validation pipeline.
//!
//!   policy id → PolicyStore → RuleEvaluator → findings → scorer → result
//!
//! An unknown policy id never reaches the evaluator: it short-circuits into
//! the conservative `ValidationResult::policy_not_found` result.

use std::sync::Arc;

use tracing::{debug, info, warn};

use candor_contracts::{
    error::{CandorError, CandorResult},
    finding::{Finding, ValidationResult},
    policy::Policy,
};

use crate::{
    scorer,
    traits::{PolicyStore, RuleEvaluator},
};

/// Validates content against policies held by a `PolicyStore`.
///
/// Holds no request-scoped state; share one instance across threads.
pub struct ComplianceValidator {
    store: Arc<dyn PolicyStore>,
    evaluator: Box<dyn RuleEvaluator>,
}

impl ComplianceValidator {
    pub fn new(store: Arc<dyn PolicyStore>, evaluator: Box<dyn RuleEvaluator>) -> Self {
        Self { store, evaluator }
    }

    /// Validate `content` against the policy registered as `policy_id`.
    ///
    /// # Errors
    ///
    /// Returns `CandorError::InvalidInput` for a blank policy id.  An id that
    /// is well-formed but unknown is NOT an error here: it yields a score-0,
    /// non-compliant result with a single `"unknown"` violation.
    pub fn validate(
        &self,
        content: &str,
        policy_id: &str,
        language: Option<&str>,
    ) -> CandorResult<ValidationResult> {
        if policy_id.trim().is_empty() {
            return Err(CandorError::InvalidInput {
                reason: "policy id must not be empty".to_string(),
            });
        }

        let policy = match self.store.get_policy(policy_id) {
            Ok(policy) => policy,
            Err(CandorError::PolicyNotFound { policy_id }) => {
                warn!(policy_id = %policy_id, "validation requested for unknown policy");
                return Ok(ValidationResult::policy_not_found(&policy_id));
            }
            Err(other) => return Err(other),
        };

        Ok(self.validate_with_policy(content, &policy, language))
    }

    /// Validate `content` against an already resolved policy.
    pub fn validate_with_policy(
        &self,
        content: &str,
        policy: &Policy,
        language: Option<&str>,
    ) -> ValidationResult {
        debug!(
            policy_id = %policy.id,
            framework = %policy.framework_id,
            content_len = content.len(),
            "validating content"
        );

        let findings = self.evaluator.evaluate(content, policy, language);
        let score = scorer::score(&findings);
        let (violations, warnings) = scorer::partition(findings);
        let recommendations = recommendations(policy, &violations, &warnings, score.compliant);

        info!(
            policy_id = %policy.id,
            score = score.score,
            compliant = score.compliant,
            violations = violations.len(),
            warnings = warnings.len(),
            "validation complete"
        );

        ValidationResult {
            compliant: score.compliant,
            score: score.score,
            violations,
            warnings,
            recommendations,
        }
    }
}

/// Remediations of every finding (violations first, first occurrence wins),
/// then the policy's standing obligations when the content is non-compliant.
fn recommendations(
    policy: &Policy,
    violations: &[Finding],
    warnings: &[Finding],
    compliant: bool,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for finding in violations.iter().chain(warnings) {
        push_unique(&mut out, finding.remediation.trim().to_string());
    }

    if compliant {
        return out;
    }

    let framework = policy.framework_id.to_uppercase();
    let handling = &policy.data_handling;
    if handling.pii_redaction_required {
        push_unique(&mut out, format!("{framework}: redact personal data before it is stored or transmitted"));
    }
    if handling.encryption_required {
        push_unique(&mut out, format!("{framework}: encrypt sensitive data at rest and in transit"));
    }
    if handling.consent_required {
        push_unique(&mut out, format!("{framework}: confirm a recorded consent basis for the personal data involved"));
    }
    if let Some(days) = handling.retention_days {
        push_unique(&mut out, format!("{framework}: retain personal data for no longer than {days} days"));
    }

    let audit = &policy.audit_requirements;
    if audit.log_all_access || audit.log_all_modifications {
        push_unique(&mut out, format!("{framework}: make sure access to and changes of the affected data are logged"));
    }
    if audit.immutable_logs {
        push_unique(&mut out, format!("{framework}: record the remediation in an immutable audit log"));
    }

    out
}

fn push_unique(out: &mut Vec<String>, line: String) {
    if !line.is_empty() && !out.contains(&line) {
        out.push(line);
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
