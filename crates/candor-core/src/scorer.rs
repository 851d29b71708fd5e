//! Compliance scoring.
//!
//! The numeric score and the compliant verdict are computed independently.
//! The score is `100 - Σ weight(severity)` clamped to `0..=100`; the verdict
//! is false whenever any finding is critical or high.  No score threshold
//! ever decides compliance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use candor_contracts::{finding::Finding, policy::Severity};

/// Points deducted from the score per finding of each severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// The one weight table used by every call site.
pub const SEVERITY_WEIGHTS: SeverityWeights = SeverityWeights {
    critical: 25,
    high: 15,
    medium: 10,
    low: 5,
};

pub const MAX_SCORE: u8 = 100;

/// Aggregate of a findings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub score: u8,
    pub compliant: bool,
}

/// Score a findings list with the canonical weight table.
pub fn score(findings: &[Finding]) -> Score {
    let deducted: u32 = findings
        .iter()
        .map(|f| SEVERITY_WEIGHTS.weight(f.severity))
        .fold(0u32, u32::saturating_add);
    let score = u32::from(MAX_SCORE).saturating_sub(deducted) as u8;
    let compliant = !findings.iter().any(Finding::is_violation);

    debug!(
        finding_count = findings.len(),
        deducted,
        score,
        compliant,
        "scored findings"
    );

    Score { score, compliant }
}

/// Split findings into `(violations, warnings)`, preserving order.
pub fn partition(findings: Vec<Finding>) -> (Vec<Finding>, Vec<Finding>) {
    findings.into_iter().partition(Finding::is_violation)
}

// ── Tests ────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use candor_contracts::{finding::Finding, policy::Severity};
    use proptest::prelude::*;

    use super::score;

    fn arb_severity() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Critical),
            Just(Severity::High),
            Just(Severity::Medium),
            Just(Severity::Low),
        ]
    }

    fn arb_findings() -> impl Strategy<Value = Vec<Finding>> {
        prop::collection::vec(
            ("[a-z]{1,8}", arb_severity()).prop_map(|(id, severity)| Finding {
                rule_id: id.clone(),
                rule_name: id,
                severity,
                description: String::new(),
                remediation: String::new(),
                location: None,
            }),
            0..24,
        )
    }

    proptest! {
        #[test]
        fn verdict_tracks_critical_and_high_only(findings in arb_findings()) {
            let s = score(&findings);
            let has_violation = findings
                .iter()
                .any(|f| matches!(f.severity, Severity::Critical | Severity::High));
            prop_assert_eq!(s.compliant, !has_violation);
            prop_assert!(s.score <= 100);
        }

        #[test]
        fn adding_findings_never_raises_the_score(
            base in arb_findings(),
            extra in arb_findings(),
        ) {
            let mut superset = base.clone();
            superset.extend(extra);
            prop_assert!(score(&superset).score <= score(&base).score);
        }

        #[test]
        fn scoring_is_deterministic(findings in arb_findings()) {
            prop_assert_eq!(score(&findings), score(&findings));
        }
    }
}
