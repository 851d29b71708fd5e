//! # candor-policy
//!
//! The TOML-driven policy catalog and regex rule evaluator for CANDOR.
//!
//! ## Overview
//!
//! [`PolicyCatalog`] holds policies keyed by id and implements
//! [`PolicyStore`](candor_core::traits::PolicyStore).  [`RegexRuleEvaluator`]
//! implements [`RuleEvaluator`](candor_core::traits::RuleEvaluator): every
//! rule is a regular expression and every match is a finding.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use candor_core::ComplianceValidator;
//! use candor_policy::{PolicyCatalog, RegexRuleEvaluator};
//!
//! let catalog = Arc::new(PolicyCatalog::builtin()?);
//! let validator = ComplianceValidator::new(catalog, Box::new(RegexRuleEvaluator::new()));
//! let result = validator.validate("user_email = 'a@b.com'", "gdpr-standard", None)?;
//! ```
//!
//! ## Rule scoping
//!
//! Framework-specific checks are plain rules with an `applies_to` field.
//! The evaluator has no per-framework branches.

pub mod catalog;
pub mod engine;
pub mod rule;

pub use catalog::{PolicyCatalog, BUILTIN_POLICIES};
pub use engine::RegexRuleEvaluator;
pub use rule::{compile_rule, CatalogDocument};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use candor_contracts::{
        error::CandorError,
        policy::{CaseMode, DataHandling, Policy, Rule, Severity},
    };
    use candor_core::ComplianceValidator;

    use crate::{PolicyCatalog, RegexRuleEvaluator};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn builtin_validator() -> ComplianceValidator {
        let catalog = Arc::new(PolicyCatalog::builtin().unwrap());
        ComplianceValidator::new(catalog, Box::new(RegexRuleEvaluator::new()))
    }

    fn custom_policy(id: &str, rules: Vec<Rule>) -> Policy {
        Policy {
            id: id.to_string(),
            framework_id: "custom".to_string(),
            description: String::new(),
            data_handling: DataHandling::default(),
            audit_requirements: Default::default(),
            rules,
        }
    }

    fn rule(id: &str, pattern: &str, severity: Severity) -> Rule {
        Rule {
            id: id.to_string(),
            name: None,
            pattern: pattern.to_string(),
            severity,
            message: format!("{id} matched"),
            remediation: String::new(),
            applies_to: "custom".to_string(),
            case: CaseMode::Insensitive,
        }
    }

    // ── 1. built-in catalog ───────────────────────────────────────────────────

    #[test]
    fn builtin_catalog_loads_all_frameworks() {
        let catalog = PolicyCatalog::builtin().unwrap();
        assert_eq!(
            catalog.policy_ids(),
            vec!["gdpr-standard", "hipaa-standard", "pci-dss-standard", "soc2-standard"]
        );
        for id in catalog.policy_ids() {
            let policy = catalog.get_policy(&id).unwrap();
            assert!(!policy.rules.is_empty(), "{id} has no rules");
            for rule in &policy.rules {
                crate::compile_rule(rule, None)
                    .unwrap_or_else(|e| panic!("{id}/{} does not compile: {e}", rule.id));
            }
        }
    }

    #[test]
    fn unknown_policy_is_policy_not_found() {
        let catalog = PolicyCatalog::builtin().unwrap();
        match catalog.get_policy("iso-27001") {
            Err(CandorError::PolicyNotFound { policy_id }) => assert_eq!(policy_id, "iso-27001"),
            other => panic!("expected PolicyNotFound, got {:?}", other),
        }
    }

    // ── 2. registration ───────────────────────────────────────────────────────

    #[test]
    fn register_policy_is_last_writer_wins() {
        let catalog = PolicyCatalog::new();
        assert!(catalog.is_empty());

        let first = custom_policy("team", vec![rule("a", "a", Severity::Low)]);
        assert!(catalog.register_policy(first).unwrap().is_none());

        let second = custom_policy("team", vec![rule("b", "b", Severity::High)]);
        let replaced = catalog.register_policy(second).unwrap().unwrap();
        assert_eq!(replaced.rules[0].id, "a");

        let current = catalog.get_policy("team").unwrap();
        assert_eq!(current.rules.len(), 1);
        assert_eq!(current.rules[0].id, "b");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn register_rejects_duplicate_rule_ids() {
        let catalog = PolicyCatalog::new();
        let policy = custom_policy("dup", vec![rule("x", "a", Severity::Low), rule("x", "b", Severity::Low)]);
        assert!(matches!(
            catalog.register_policy(policy),
            Err(CandorError::ConfigError { .. })
        ));
        assert!(!catalog.contains("dup"));
    }

    #[test]
    fn readers_keep_their_snapshot_across_replacement() {
        let catalog = PolicyCatalog::new();
        catalog
            .register_policy(custom_policy("p", vec![rule("old", "x", Severity::Low)]))
            .unwrap();
        let snapshot = catalog.get_policy("p").unwrap();
        catalog
            .register_policy(custom_policy("p", vec![rule("new", "x", Severity::Low)]))
            .unwrap();
        assert_eq!(snapshot.rules[0].id, "old");
        assert_eq!(catalog.get_policy("p").unwrap().rules[0].id, "new");
    }

    #[test]
    fn concurrent_readers_and_writer_see_whole_policies() {
        let catalog = Arc::new(PolicyCatalog::new());
        catalog
            .register_policy(custom_policy("p", vec![rule("v0-a", "x", Severity::Low), rule("v0-b", "x", Severity::Low)]))
            .unwrap();

        let writer = {
            let catalog = Arc::clone(&catalog);
            std::thread::spawn(move || {
                for v in 1..50 {
                    let rules = vec![
                        rule(&format!("v{v}-a"), "x", Severity::Low),
                        rule(&format!("v{v}-b"), "x", Severity::Low),
                    ];
                    catalog.register_policy(custom_policy("p", rules)).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let policy = catalog.get_policy("p").unwrap();
                        let a = policy.rules[0].id.trim_end_matches("-a").to_string();
                        let b = policy.rules[1].id.trim_end_matches("-b").to_string();
                        assert_eq!(a, b, "observed a mixed policy");
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }

    // ── 3. TOML loading ───────────────────────────────────────────────────────

    #[test]
    fn toml_parse_error_is_config_error() {
        match PolicyCatalog::from_toml_str("this is not valid toml ][[[") {
            Err(CandorError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse policy catalog TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn document_loads_completely_or_not_at_all() {
        let toml = r#"
            [[policies]]
            id = "good"
            framework_id = "custom"

            [[policies]]
            id = ""
            framework_id = "custom"
        "#;
        let catalog = PolicyCatalog::new();
        assert!(catalog.load_toml_str(toml).is_err());
        assert!(catalog.is_empty(), "no policy may be registered from a rejected document");
    }

    #[test]
    fn catalog_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[policies]]
            id = "team-standard"
            framework_id = "custom"

            [[policies.rules]]
            id = "team-token"
            pattern = 'tok_[a-z0-9]{{8}}'
            severity = "critical"
            message = "API token in content"
            applies_to = "custom"
            "#
        )
        .unwrap();

        let catalog = PolicyCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.policy_ids(), vec!["team-standard"]);
        assert_eq!(catalog.get_policy("team-standard").unwrap().rules[0].id, "team-token");

        let builtin = PolicyCatalog::builtin().unwrap();
        let before = builtin.len();
        assert_eq!(builtin.load_file(file.path()).unwrap(), 1);
        assert_eq!(builtin.len(), before + 1);
    }

    #[test]
    fn unreadable_catalog_path_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        match PolicyCatalog::from_file(&missing) {
            Err(CandorError::ConfigError { reason }) => {
                assert!(reason.contains("failed to read policy catalog"), "got: {reason}");
                assert!(reason.contains("missing.toml"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
        let catalog = PolicyCatalog::new();
        assert!(matches!(catalog.load_file(&missing), Err(CandorError::ConfigError { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn malformed_pattern_does_not_block_loading() {
        let toml = r#"
            [[policies]]
            id = "custom-standard"
            framework_id = "custom"

            [[policies.rules]]
            id = "broken"
            pattern = "(unclosed"
            severity = "high"
            message = "never compiles"
            applies_to = "custom"
        "#;
        let catalog = PolicyCatalog::from_toml_str(toml).unwrap();
        assert!(catalog.contains("custom-standard"));
    }

    // ── 4. end-to-end scenarios ───────────────────────────────────────────────

    #[test]
    fn email_against_gdpr_is_one_high_violation() {
        let result = builtin_validator()
            .validate("user_email = 'a@b.com'", "gdpr-standard", Some("python"))
            .unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule_id, "gdpr-pii-email");
        assert_eq!(result.violations[0].severity, Severity::High);
        assert!(result.warnings.is_empty());
        assert_eq!(result.score, 85);
        assert!(!result.compliant);
    }

    #[test]
    fn card_number_against_pci_is_critical_but_scores_75() {
        let result = builtin_validator()
            .validate("4111 1111 1111 1111", "pci-dss-standard", None)
            .unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule_id, "pci-card-number");
        assert_eq!(result.violations[0].rule_name, "No CVV/Card storage");
        assert_eq!(result.violations[0].severity, Severity::Critical);
        assert_eq!(result.score, 75);
        assert!(!result.compliant);
    }

    #[test]
    fn unknown_policy_id_scores_zero() {
        let result = builtin_validator().validate("anything", "made-up", None).unwrap();
        assert!(!result.compliant);
        assert_eq!(result.score, 0);
        assert_eq!(result.violations[0].rule_id, "unknown");
    }

    #[test]
    fn empty_content_scores_100_for_every_builtin_policy() {
        let validator = builtin_validator();
        for id in PolicyCatalog::builtin().unwrap().policy_ids() {
            let result = validator.validate("", &id, None).unwrap();
            assert!(result.compliant, "{id}");
            assert_eq!(result.score, 100, "{id}");
            assert!(result.violations.is_empty() && result.warnings.is_empty());
        }
    }

    #[test]
    fn soc2_secrets_and_hygiene() {
        let content = "password = \"hunter22\"\nverify = false\n# TODO: fix auth check\nDEBUG = true\n";
        let result = builtin_validator().validate(content, "soc2-standard", None).unwrap();

        let violation_ids: Vec<_> = result.violations.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(violation_ids, vec!["soc2-hardcoded-secret", "soc2-tls-disabled"]);
        let warning_ids: Vec<_> = result.warnings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(warning_ids, vec!["soc2-debug-enabled", "soc2-security-todo"]);
        // 100 - 25 - 15 - 10 - 5
        assert_eq!(result.score, 45);
        assert!(!result.compliant);
    }

    #[test]
    fn warnings_only_stays_compliant() {
        let result = builtin_validator()
            .validate("fetch('http://api.internal')", "hipaa-standard", Some("javascript"))
            .unwrap();
        assert!(result.violations.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].rule_id, "plain-http");
        assert_eq!(result.score, 95);
        assert!(result.compliant);
    }
}
