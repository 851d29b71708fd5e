//! Regex rule evaluator.
//!
//! `RegexRuleEvaluator` implements the `RuleEvaluator` trait from
//! candor-core.
//!
//! Evaluation algorithm:
//!
//! 1. Empty content yields no findings.
//! 2. For each rule in the policy:
//!    a. Skip it unless `applies_to` names the policy's framework or `"*"`.
//!    b. Look up the compiled pattern, compiling it on first use.  On
//!       failure, emit one low-severity finding naming the rule and move on
//!       to the next rule.
//!    c. Emit one finding per non-empty match, located by line and column.
//! 3. Sort by severity (highest first), then rule id, then location.
//!
//! Compiled patterns are cached per evaluator, keyed by pattern text and
//! resolved case sensitivity.  Compile failures are cached too.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use regex::Regex;
use tracing::{debug, warn};

use candor_contracts::{
    error::{CandorError, CandorResult},
    finding::{Finding, Location},
    policy::{Policy, Rule, Severity},
};
use candor_core::traits::RuleEvaluator;

use crate::rule::compile_rule;

/// Rule name reported on findings for rules that could not be compiled.
pub const MALFORMED_RULE_NAME: &str = "malformed rule";

/// A compiled pattern, or the reason it failed to compile.
type CompiledPattern = Result<Regex, String>;

/// Evaluates policy rules as regular expressions over raw content.
///
/// Share one instance across requests so each pattern is compiled once.
#[derive(Debug, Default)]
pub struct RegexRuleEvaluator {
    /// Index 0 holds case-insensitive compilations, index 1 case-sensitive.
    compiled: RwLock<[HashMap<String, CompiledPattern>; 2]>,
}

impl RegexRuleEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct compilations held, malformed ones included.
    pub fn compiled_len(&self) -> usize {
        let compiled = self.compiled.read().unwrap_or_else(PoisonError::into_inner);
        compiled.iter().map(HashMap::len).sum()
    }

    fn regex_for(&self, rule: &Rule, language: Option<&str>) -> CandorResult<Regex> {
        let slot = usize::from(rule.case.is_case_sensitive(language));
        let malformed = |reason: String| CandorError::MalformedRule {
            rule_id: rule.id.clone(),
            reason,
        };

        let cached = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)[slot]
            .get(rule.pattern.as_str())
            .cloned();
        if let Some(pattern) = cached {
            return pattern.map_err(malformed);
        }

        let pattern = match compile_rule(rule, language) {
            Ok(regex) => Ok(regex),
            Err(CandorError::MalformedRule { reason, .. }) => Err(reason),
            Err(other) => Err(other.to_string()),
        };
        debug!(rule_id = %rule.id, ok = pattern.is_ok(), "compiled rule pattern");

        self.compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner)[slot]
            .entry(rule.pattern.clone())
            .or_insert(pattern)
            .clone()
            .map_err(malformed)
    }
}

impl RuleEvaluator for RegexRuleEvaluator {
    fn evaluate(&self, content: &str, policy: &Policy, language: Option<&str>) -> Vec<Finding> {
        if content.is_empty() {
            debug!(policy_id = %policy.id, "empty content; nothing to evaluate");
            return Vec::new();
        }

        let index = LineIndex::new(content);
        let mut findings = Vec::new();

        for rule in &policy.rules {
            if !rule.applies_to_framework(&policy.framework_id) {
                debug!(
                    rule_id = %rule.id,
                    applies_to = %rule.applies_to,
                    framework = %policy.framework_id,
                    "rule out of scope for framework"
                );
                continue;
            }

            let regex = match self.regex_for(rule, language) {
                Ok(regex) => regex,
                Err(e) => {
                    warn!(policy_id = %policy.id, rule_id = %rule.id, error = %e, "skipping malformed rule");
                    findings.push(malformed_rule_finding(rule, &e));
                    continue;
                }
            };

            let before = findings.len();
            for m in regex.find_iter(content) {
                if m.start() == m.end() {
                    continue;
                }
                findings.push(Finding::from_rule(rule, Some(index.locate(m.start()))));
            }

            if findings.len() > before {
                debug!(rule_id = %rule.id, matches = findings.len() - before, "rule matched");
            }
        }

        sort_findings(&mut findings);
        findings
    }
}

/// Deterministic output order: severity desc, rule id asc, location asc.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
            .then_with(|| a.location.cmp(&b.location))
    });
}

fn malformed_rule_finding(rule: &Rule, error: &CandorError) -> Finding {
    Finding {
        rule_id: rule.id.clone(),
        rule_name: MALFORMED_RULE_NAME.to_string(),
        severity: Severity::Low,
        description: format!("rule was skipped: {error}"),
        remediation: format!("Fix the pattern of rule '{}' in the policy catalog", rule.id),
        location: None,
    }
}

/// Byte offset → (line, column) lookup for one piece of content.
struct LineIndex<'a> {
    content: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { content, line_starts }
    }

    /// `offset` must lie on a char boundary, which regex match starts do.
    fn locate(&self, offset: usize) -> Location {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.content[line_start..offset].chars().count() + 1;
        Location { line, column }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
