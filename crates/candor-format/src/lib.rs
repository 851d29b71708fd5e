//! # candor-format
//!
//! Turns validation results and conflicts into the published wire payloads.
//!
//! Every output is wrapped in a [`report::Report`] envelope (report id,
//! generation time, optional policy id or topic).  Two renderings exist:
//!
//! 1. **JSON**: checked against [`schema::report_schema`] with the
//!    `jsonschema` crate before it is returned.
//! 2. **Markdown**: tables and lists for human readers.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use candor_format::{render, Format, Report};
//!
//! let report = Report::validation("gdpr-standard", result);
//! println!("{}", render(&report, Format::Json)?);
//! ```

pub mod json;
pub mod markdown;
pub mod report;
pub mod schema;

use std::{fmt, str::FromStr};

use candor_contracts::error::{CandorError, CandorResult};

pub use json::JsonFormatter;
pub use report::{Report, ReportBody};

/// Output rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Markdown => "markdown",
        })
    }
}

impl FromStr for Format {
    type Err = CandorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            other => Err(CandorError::InvalidInput {
                reason: format!("unknown output format '{other}'; expected json or markdown"),
            }),
        }
    }
}

/// Render `report` in `format`.
pub fn render(report: &Report, format: Format) -> CandorResult<String> {
    match format {
        Format::Json => JsonFormatter::new()?.render(report),
        Format::Markdown => Ok(markdown::render(report)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use candor_contracts::{
        conflict::{Conflict, ConflictSeverity, Resolution},
        error::CandorError,
        finding::{Finding, Location, ValidationResult},
        policy::Severity,
    };

    use super::*;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn finding(id: &str, severity: Severity, location: Option<Location>) -> Finding {
        Finding {
            rule_id: id.to_string(),
            rule_name: format!("{id} | name"),
            severity,
            description: format!("{id} matched"),
            remediation: format!("fix {id}"),
            location,
        }
    }

    fn email_result() -> ValidationResult {
        ValidationResult {
            compliant: false,
            score: 85,
            violations: vec![finding(
                "gdpr-pii-email",
                Severity::High,
                Some(Location { line: 1, column: 15 }),
            )],
            warnings: vec![],
            recommendations: vec!["fix gdpr-pii-email".to_string()],
        }
    }

    fn rate_limit_conflict() -> Conflict {
        Conflict {
            topic: "API rate limit".to_string(),
            official_answer: "Rate limit is 100 requests/minute".to_string(),
            official_source: "API Reference v2".to_string(),
            practical_answer: "API crashes after 50/min".to_string(),
            practical_source: "#backend".to_string(),
            severity: ConflictSeverity::High,
            recommendation: "Follow the practical answer from #backend.".to_string(),
            resolution: Resolution::PreferPractical,
            official_weight: 0.25,
            practical_weight: 0.985,
            overlap: 0.43,
        }
    }

    fn fixed(report: Report) -> Report {
        report.at(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap())
    }

    fn parse(rendered: &str) -> Value {
        serde_json::from_str(rendered).unwrap()
    }

    // ── JSON ──────────────────────────────────────────────────────────────────

    #[test]
    fn validation_report_uses_stable_field_names() {
        let report = fixed(Report::validation("gdpr-standard", email_result()));
        let value = parse(&render(&report, Format::Json).unwrap());

        assert_eq!(value["policyId"], "gdpr-standard");
        assert_eq!(value["generatedAt"], "2026-10-19T09:00:00Z");
        assert!(value.get("topic").is_none());
        assert_eq!(value["result"]["kind"], "validation");
        assert_eq!(value["result"]["score"], 85);
        assert_eq!(value["result"]["compliant"], false);

        let v = &value["result"]["violations"][0];
        assert_eq!(v["ruleId"], "gdpr-pii-email");
        assert_eq!(v["severity"], "high");
        assert_eq!(v["location"], json!({ "line": 1, "column": 15 }));
    }

    #[test]
    fn reconciliation_report_carries_conflicts() {
        let report = fixed(Report::reconciliation(Some("rate limit"), vec![rate_limit_conflict()]));
        let value = parse(&render(&report, Format::Json).unwrap());

        assert_eq!(value["topic"], "rate limit");
        assert!(value.get("policyId").is_none());
        let c = &value["result"]["conflicts"][0];
        assert_eq!(c["officialAnswer"], "Rate limit is 100 requests/minute");
        assert_eq!(c["practicalSource"], "#backend");
        assert_eq!(c["severity"], "high");
        assert_eq!(c["resolution"], "prefer-practical");
    }

    #[test]
    fn report_ids_are_unique() {
        let a = Report::validation("p", email_result());
        let b = Report::validation("p", email_result());
        assert_ne!(a.report_id, b.report_id);
    }

    #[test]
    fn compact_output_is_one_line() {
        let report = Report::reconciliation(None, vec![]);
        let rendered = JsonFormatter::new().unwrap().compact().render(&report).unwrap();
        assert!(!rendered.contains('\n'));
    }

    #[test]
    fn misfiled_finding_fails_the_schema() {
        let mut result = email_result();
        // A low-severity finding listed under violations breaks the contract.
        result.violations.push(finding("plain-http", Severity::Low, None));
        let err = render(&Report::validation("gdpr-standard", result), Format::Json).unwrap_err();
        assert!(matches!(err, CandorError::SchemaValidation { .. }));
    }

    #[test]
    fn check_reports_every_violation() {
        let formatter = JsonFormatter::new().unwrap();
        let bad = json!({
            "reportId": "not-a-uuid",
            "generatedAt": "2026-10-19T09:00:00Z",
            "result": { "kind": "validation", "compliant": true, "score": 140,
                        "violations": [], "warnings": [], "recommendations": [] }
        });
        match formatter.check(&bad) {
            Err(CandorError::SchemaValidation { reason }) => {
                assert!(reason.contains("reportId"), "reason: {reason}");
                assert!(reason.contains("result"), "reason: {reason}");
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    // ── Markdown ──────────────────────────────────────────────────────────────

    #[test]
    fn markdown_validation_report() {
        let report = fixed(Report::validation("gdpr-standard", email_result()));
        let md = render(&report, Format::Markdown).unwrap();

        assert!(md.starts_with("# Compliance report: gdpr-standard\n"));
        assert!(md.contains("**Verdict:** non-compliant, score 85/100"));
        assert!(md.contains("## Violations (1)"));
        assert!(md.contains("| high | gdpr-pii-email \\| name (`gdpr-pii-email`) | 1:15 |"));
        assert!(md.contains("## Warnings (0)\n\n_None._"));
        assert!(md.contains("- fix gdpr-pii-email"));
    }

    #[test]
    fn markdown_conflict_report() {
        let report = fixed(Report::reconciliation(None, vec![rate_limit_conflict()]));
        let md = render(&report, Format::Markdown).unwrap();

        assert!(md.starts_with("# Reconciliation report: all topics\n"));
        assert!(md.contains("1 conflict found."));
        assert!(md.contains("## 1. API rate limit (high, prefer-practical)"));
        assert!(md.contains("- **Official** (API Reference v2, weight 0.25): Rate limit is 100 requests/minute"));
        assert!(md.contains("> Follow the practical answer from #backend."));
    }

    #[test]
    fn markdown_without_conflicts() {
        let md = render(&Report::reconciliation(Some("cache"), vec![]), Format::Markdown).unwrap();
        assert!(md.contains("No conflicts between official and practical sources."));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("md".parse::<Format>().unwrap(), Format::Markdown);
        assert!(matches!(
            "yaml".parse::<Format>(),
            Err(CandorError::InvalidInput { .. })
        ));
    }
}
