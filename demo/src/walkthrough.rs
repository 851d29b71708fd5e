//! Reference scenarios run end to end on built-in data.
//!
//!   1. Email address in code against GDPR: one high violation, score 85.
//!   2. Card number against PCI-DSS: one critical violation, score 75.
//!   3. Stale official rate limit vs fresh team chat: high conflict,
//!      practical answer preferred.
//!   4. Both sources fresh: both answers surfaced.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use candor_contracts::{
    conflict::Conflict,
    error::CandorResult,
    finding::ValidationResult,
    source::{DocumentMetadata, SourceDocument},
};
use candor_core::ComplianceValidator;
use candor_policy::{PolicyCatalog, RegexRuleEvaluator};
use candor_reconcile::{ConflictDetector, KeywordClassifier};

pub fn run_all() -> CandorResult<()> {
    println!();
    println!("CANDOR walkthrough");
    println!("==================");
    println!();

    let catalog = Arc::new(PolicyCatalog::builtin()?);
    let validator = ComplianceValidator::new(catalog, Box::new(RegexRuleEvaluator::new()));

    println!("=== Scenario 1: email address against gdpr-standard ===");
    let result = validator.validate("user_email = 'a@b.com'", "gdpr-standard", Some("python"))?;
    print_result(&result);

    println!("=== Scenario 2: card number against pci-dss-standard ===");
    let result = validator.validate("4111 1111 1111 1111", "pci-dss-standard", None)?;
    print_result(&result);

    let now = Utc::now();
    let detector = ConflictDetector::default();
    let classifier = KeywordClassifier::new();

    println!("=== Scenario 3: 180-day-old docs vs 2-day-old chat ===");
    let sections: Vec<_> = rate_limit_documents(now, 180, 2)
        .iter()
        .map(|d| classifier.to_section(d, now))
        .collect();
    print_conflicts(&detector.detect(&sections, None, now));

    println!("=== Scenario 4: both sources 2 days old ===");
    let sections: Vec<_> = rate_limit_documents(now, 2, 2)
        .iter()
        .map(|d| classifier.to_section(d, now))
        .collect();
    print_conflicts(&detector.detect(&sections, None, now));

    println!("Walkthrough complete.");
    Ok(())
}

fn document(
    title: &str,
    content: &str,
    source_type: &str,
    channel: &str,
    timestamp: DateTime<Utc>,
) -> SourceDocument {
    SourceDocument {
        metadata: Some(DocumentMetadata {
            source_type: Some(source_type.to_string()),
            channel: Some(channel.to_string()),
            timestamp: Some(timestamp),
            ..Default::default()
        }),
        title: title.to_string(),
        content: content.to_string(),
    }
}

fn rate_limit_documents(now: DateTime<Utc>, official_age: i64, practical_age: i64) -> Vec<SourceDocument> {
    vec![
        document(
            "API rate limit",
            "Rate limit is 100 requests/minute",
            "official-docs",
            "API Reference v2",
            now - Duration::days(official_age),
        ),
        document(
            "API rate limit",
            "API crashes after 50/min",
            "team-chat",
            "#backend",
            now - Duration::days(practical_age),
        ),
    ]
}

fn print_result(result: &ValidationResult) {
    let verdict = if result.compliant { "COMPLIANT" } else { "NON-COMPLIANT" };
    println!("  Verdict: {verdict}  score {}/100", result.score);
    for f in result.violations.iter().chain(&result.warnings) {
        println!("  [{}] {}: {}", f.severity, f.rule_id, f.description);
    }
    println!();
}

fn print_conflicts(conflicts: &[Conflict]) {
    if conflicts.is_empty() {
        println!("  No conflicts.");
    }
    for c in conflicts {
        println!("  [{}] {} ({})", c.severity, c.topic, c.resolution);
        println!("    official  {:.2}  {}: {}", c.official_weight, c.official_source, c.official_answer);
        println!("    practical {:.2}  {}: {}", c.practical_weight, c.practical_source, c.practical_answer);
        println!("    {}", c.recommendation);
    }
    println!();
}
