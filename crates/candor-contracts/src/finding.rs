//! Findings and validation results.
//!
//! These are the wire payloads handed to the presentation layer, so field
//! names are serialized in camelCase and must stay stable.

use serde::{Deserialize, Serialize};

use crate::policy::{Rule, Severity};

/// Where in the scanned content a match starts.  Both fields are 1-based;
/// `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// A single rule match against content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Finding {
    /// Build the finding for one match of `rule`.
    pub fn from_rule(rule: &Rule, location: Option<Location>) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.display_name().to_string(),
            severity: rule.severity,
            description: rule.message.clone(),
            remediation: rule.remediation.clone(),
            location,
        }
    }

    /// True when this finding belongs in `violations` rather than `warnings`.
    pub fn is_violation(&self) -> bool {
        self.severity.is_violation()
    }
}

/// The outcome of validating one piece of content against one policy.
///
/// Derived on every call; never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// False whenever any violation is critical or high, whatever the score.
    pub compliant: bool,
    /// 0..=100
    pub score: u8,
    /// Findings of severity critical or high.
    pub violations: Vec<Finding>,
    /// Findings of severity medium or low.
    pub warnings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

impl ValidationResult {
    /// Rule id reported when the requested policy does not exist.
    pub const UNKNOWN_RULE_ID: &'static str = "unknown";

    /// The maximally conservative result for an unregistered policy id.
    pub fn policy_not_found(policy_id: &str) -> Self {
        Self {
            compliant: false,
            score: 0,
            violations: vec![Finding {
                rule_id: Self::UNKNOWN_RULE_ID.to_string(),
                rule_name: "unknown policy".to_string(),
                severity: Severity::Critical,
                description: format!(
                    "policy '{policy_id}' is not registered; content could not be validated"
                ),
                remediation: "Register the policy or request one that exists in the catalog"
                    .to_string(),
                location: None,
            }],
            warnings: Vec::new(),
            recommendations: vec![format!(
                "Validate against a registered policy; '{policy_id}' is unknown"
            )],
        }
    }
}
