//! Markdown rendering for people reading a terminal or a pull request.

use candor_contracts::{
    conflict::Conflict,
    finding::{Finding, ValidationResult},
};

use crate::report::{Report, ReportBody};

/// Render `report` as a Markdown document.
pub fn render(report: &Report) -> String {
    let mut out = String::new();
    match &report.result {
        ReportBody::Validation(result) => {
            let policy = report.policy_id.as_deref().unwrap_or("unspecified policy");
            out.push_str(&format!("# Compliance report: {policy}\n\n"));
            push_header(&mut out, report);
            render_validation(&mut out, result);
        }
        ReportBody::Reconciliation { conflicts } => {
            let topic = report.topic.as_deref().unwrap_or("all topics");
            out.push_str(&format!("# Reconciliation report: {topic}\n\n"));
            push_header(&mut out, report);
            render_conflicts(&mut out, conflicts);
        }
    }
    out
}

fn push_header(out: &mut String, report: &Report) {
    out.push_str(&format!(
        "Report `{}` generated {}\n\n",
        report.report_id,
        report.generated_at.to_rfc3339()
    ));
}

fn render_validation(out: &mut String, result: &ValidationResult) {
    let verdict = if result.compliant { "compliant" } else { "non-compliant" };
    out.push_str(&format!(
        "**Verdict:** {verdict}, score {}/100\n\n",
        result.score
    ));

    findings_table(out, "Violations", &result.violations);
    findings_table(out, "Warnings", &result.warnings);

    out.push_str("## Recommendations\n\n");
    if result.recommendations.is_empty() {
        out.push_str("_None._\n");
    }
    for recommendation in &result.recommendations {
        out.push_str(&format!("- {recommendation}\n"));
    }
}

fn findings_table(out: &mut String, title: &str, findings: &[Finding]) {
    out.push_str(&format!("## {title} ({})\n\n", findings.len()));
    if findings.is_empty() {
        out.push_str("_None._\n\n");
        return;
    }
    out.push_str("| Severity | Rule | Location | Description |\n");
    out.push_str("|---|---|---|---|\n");
    for f in findings {
        let location = f
            .location
            .map(|l| format!("{}:{}", l.line, l.column))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "| {} | {} (`{}`) | {} | {} |\n",
            f.severity,
            cell(&f.rule_name),
            cell(&f.rule_id),
            location,
            cell(&f.description)
        ));
    }
    out.push('\n');
}

fn render_conflicts(out: &mut String, conflicts: &[Conflict]) {
    if conflicts.is_empty() {
        out.push_str("No conflicts between official and practical sources.\n");
        return;
    }
    let noun = if conflicts.len() == 1 { "conflict" } else { "conflicts" };
    out.push_str(&format!("{} {noun} found.\n\n", conflicts.len()));

    for (i, c) in conflicts.iter().enumerate() {
        out.push_str(&format!(
            "## {}. {} ({}, {})\n\n",
            i + 1,
            c.topic,
            c.severity,
            c.resolution
        ));
        out.push_str(&format!(
            "- **Official** ({}, weight {:.2}): {}\n",
            c.official_source,
            c.official_weight,
            inline(&c.official_answer)
        ));
        out.push_str(&format!(
            "- **Practical** ({}, weight {:.2}): {}\n",
            c.practical_source,
            c.practical_weight,
            inline(&c.practical_answer)
        ));
        out.push_str(&format!("- **Overlap:** {:.2}\n\n", c.overlap));
        out.push_str(&format!("> {}\n\n", inline(&c.recommendation)));
    }
}

/// Collapse newlines so multi-line text stays inside its list item.
fn inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape a value for a table cell.
fn cell(text: &str) -> String {
    inline(text).replace('|', "\\|")
}
