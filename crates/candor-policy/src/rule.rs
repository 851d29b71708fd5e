//! Catalog document schema and rule compilation.
//!
//! A `CatalogDocument` is deserialized from TOML and holds a list of
//! `Policy` tables, each with its own `[[policies.rules]]`.  Patterns are
//! compiled on demand; a pattern that does not compile is reported as
//! `CandorError::MalformedRule` for that one rule only.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use candor_contracts::{
    error::{CandorError, CandorResult},
    policy::{Policy, Rule},
};

/// The top-level structure deserialized from a TOML catalog file.
///
/// Example:
/// ```toml
/// [[policies]]
/// id = "soc2-standard"
/// framework_id = "soc2"
///
/// [[policies.rules]]
/// id = "soc2-debug-enabled"
/// pattern = '\bdebug\s*[:=]\s*true\b'
/// severity = "medium"
/// message = "Debug mode is switched on"
/// applies_to = "soc2"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub policies: Vec<Policy>,
}

/// Upper bound on a compiled pattern's size, in bytes.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Compile `rule.pattern`, resolving its case mode against `language`.
///
/// Returns `CandorError::MalformedRule` when the pattern is empty or does
/// not compile.
pub fn compile_rule(rule: &Rule, language: Option<&str>) -> CandorResult<Regex> {
    if rule.pattern.is_empty() {
        return Err(CandorError::MalformedRule {
            rule_id: rule.id.clone(),
            reason: "pattern is empty".to_string(),
        });
    }

    RegexBuilder::new(&rule.pattern)
        .case_insensitive(!rule.case.is_case_sensitive(language))
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| CandorError::MalformedRule {
            rule_id: rule.id.clone(),
            reason: e.to_string(),
        })
}

/// Check the structural invariants of a policy: non-empty ids and unique
/// rule ids.  Patterns are not compiled here.
pub fn check_policy(policy: &Policy) -> CandorResult<()> {
    if policy.id.trim().is_empty() {
        return Err(CandorError::ConfigError {
            reason: "policy id must not be empty".to_string(),
        });
    }
    if policy.framework_id.trim().is_empty() {
        return Err(CandorError::ConfigError {
            reason: format!("policy '{}' has an empty framework_id", policy.id),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for rule in &policy.rules {
        if rule.id.trim().is_empty() {
            return Err(CandorError::ConfigError {
                reason: format!("policy '{}' contains a rule with an empty id", policy.id),
            });
        }
        if !seen.insert(rule.id.as_str()) {
            return Err(CandorError::ConfigError {
                reason: format!("policy '{}' declares rule '{}' twice", policy.id, rule.id),
            });
        }
    }
    Ok(())
}
