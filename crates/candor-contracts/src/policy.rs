//! Policy and rule definitions.
//!
//! A `Policy` bundles the declarative rules for one compliance framework with
//! the data-handling and audit obligations that framework imposes.  Policies
//! are loaded from TOML by the catalog and are immutable afterwards; every
//! other component refers to them by id or through a shared `Arc`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a rule match is.
///
/// Variants are declared in ascending order so the derived `Ord` ranks
/// `Critical` highest.
///
/// ```toml
/// severity = "critical"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// True for the severities that make a result non-compliant.
    pub fn is_violation(self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case handling for a rule's pattern.
///
/// ```toml
/// case = "insensitive"   # default
/// case = "sensitive"
/// case = "language"      # follow the request's language tag
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseMode {
    #[default]
    Insensitive,
    Sensitive,
    /// Case-sensitive when the content's language has case-sensitive
    /// identifiers, insensitive otherwise.
    Language,
}

/// Languages whose identifiers are case-sensitive.
const CASE_SENSITIVE_LANGUAGES: &[&str] = &[
    "rust",
    "c",
    "cpp",
    "c++",
    "java",
    "javascript",
    "js",
    "typescript",
    "ts",
    "python",
    "go",
    "ruby",
    "kotlin",
    "swift",
    "csharp",
    "c#",
    "scala",
    "php",
    "shell",
    "bash",
];

impl CaseMode {
    /// Resolve the mode against an optional language tag.
    pub fn is_case_sensitive(self, language: Option<&str>) -> bool {
        match self {
            CaseMode::Insensitive => false,
            CaseMode::Sensitive => true,
            CaseMode::Language => language
                .map(|lang| {
                    let lang = lang.trim().to_ascii_lowercase();
                    CASE_SENSITIVE_LANGUAGES.contains(&lang.as_str())
                })
                .unwrap_or(false),
        }
    }
}

/// A single declarative check applied to content.
///
/// Each match of `pattern` in the scanned content yields one finding.  The
/// absence of a match is never a finding: "no encryption detected" must be
/// its own rule with its own pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier, reported as `ruleId` in findings.
    pub id: String,

    /// Short human-readable name.  Falls back to `id` when omitted.
    #[serde(default)]
    pub name: Option<String>,

    /// Regular expression searched for in the content.
    pub pattern: String,

    pub severity: Severity,

    /// Explanation reported as the finding's `description`.
    pub message: String,

    /// Guidance for fixing a match.
    #[serde(default)]
    pub remediation: String,

    /// Framework this rule belongs to, or `"*"` for every framework.
    pub applies_to: String,

    #[serde(default)]
    pub case: CaseMode,
}

impl Rule {
    /// The display name, defaulting to the rule id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Return true if this rule is in scope for `framework_id`.
    pub fn applies_to_framework(&self, framework_id: &str) -> bool {
        self.applies_to == "*" || self.applies_to.eq_ignore_ascii_case(framework_id)
    }
}

/// Data-handling obligations of a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataHandling {
    #[serde(default)]
    pub pii_redaction_required: bool,
    #[serde(default)]
    pub encryption_required: bool,
    /// Maximum retention for personal data, if the framework sets one.
    #[serde(default)]
    pub retention_days: Option<u32>,
    #[serde(default)]
    pub consent_required: bool,
}

/// Audit-trail obligations of a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRequirements {
    #[serde(default)]
    pub log_all_access: bool,
    #[serde(default)]
    pub log_all_modifications: bool,
    #[serde(default)]
    pub immutable_logs: bool,
}

/// A named rule set for one compliance framework.
///
/// Example:
/// ```toml
/// [[policies]]
/// id = "gdpr-standard"
/// framework_id = "gdpr"
///
/// [policies.data_handling]
/// pii_redaction_required = true
///
/// [[policies.rules]]
/// id = "gdpr-pii-email"
/// pattern = '[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}'
/// severity = "high"
/// message = "Email address in content"
/// applies_to = "gdpr"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub framework_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_handling: DataHandling,
    #[serde(default)]
    pub audit_requirements: AuditRequirements,
    #[serde(default)]
    pub rules: Vec<Rule>,
}
