//! CANDOR command-line front end.
//!
//! Validates content against compliance policies and reconciles official
//! documentation with practical sources.
//!
//! Usage:
//!   cargo run -p demo -- policies
//!   cargo run -p demo -- validate --policy gdpr-standard --text "user_email = 'a@b.com'"
//!   cargo run -p demo -- reconcile --documents demo/data/documents.json --topic "rate limit"
//!   cargo run -p demo -- walkthrough

mod walkthrough;

use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use candor_contracts::{
    error::{CandorError, CandorResult},
    source::SourceDocument,
};
use candor_core::ComplianceValidator;
use candor_format::{render, Format, Report};
use candor_policy::{PolicyCatalog, RegexRuleEvaluator};
use candor_reconcile::{dedupe_by_topic, ConflictDetector, DetectorConfig, KeywordClassifier};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CANDOR: rule-based compliance checks and truth reconciliation.
#[derive(Parser)]
#[command(
    name = "candor",
    about = "Rule-based compliance and truth-reconciliation engine",
    long_about = "Scores content against GDPR, HIPAA, PCI-DSS and SOC2 policies and\n\
                  flags where official documentation disagrees with practice."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered policies.
    Policies {
        /// Extra policy catalog (TOML) loaded over the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Validate content against one policy.
    Validate {
        /// Policy id, e.g. gdpr-standard.
        #[arg(long)]
        policy: String,
        /// Read content from this file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Validate this literal text.  Without --file or --text, stdin is read.
        #[arg(long)]
        text: Option<String>,
        /// Language tag of the content (rust, python, ...).
        #[arg(long)]
        language: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Extra policy catalog (TOML) loaded over the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Detect conflicts between official and practical documents.
    Reconcile {
        /// JSON array of documents: {metadata?, title, content}.
        #[arg(long)]
        documents: PathBuf,
        /// Only consider sections that mention this topic.
        #[arg(long)]
        topic: Option<String>,
        /// Keep only the most severe conflict per topic.
        #[arg(long)]
        dedupe: bool,
        /// Detector tunables (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Run the reference scenarios on built-in data.
    Walkthrough,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Policies { catalog } => run_policies(catalog.as_deref()),
        Command::Validate {
            policy,
            file,
            text,
            language,
            format,
            catalog,
        } => run_validate(
            &policy,
            file.as_deref(),
            text,
            language.as_deref(),
            format.into(),
            catalog.as_deref(),
        ),
        Command::Reconcile {
            documents,
            topic,
            dedupe,
            config,
            format,
        } => run_reconcile(
            &documents,
            topic.as_deref(),
            dedupe,
            config.as_deref(),
            format.into(),
        ),
        Command::Walkthrough => walkthrough::run_all(),
    };

    if let Err(e) = result {
        eprintln!("candor: {e}");
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn load_catalog(extra: Option<&Path>) -> CandorResult<PolicyCatalog> {
    let catalog = PolicyCatalog::builtin()?;
    if let Some(path) = extra {
        let loaded = catalog.load_file(path)?;
        info!(path = %path.display(), loaded, "loaded extra policy catalog");
    }
    Ok(catalog)
}

fn run_policies(extra: Option<&Path>) -> CandorResult<()> {
    let catalog = load_catalog(extra)?;
    for id in catalog.policy_ids() {
        let policy = catalog.get_policy(&id)?;
        println!(
            "{:<20} {:<8} {:>2} rules  {}",
            policy.id,
            policy.framework_id,
            policy.rules.len(),
            policy.description
        );
    }
    Ok(())
}

fn run_validate(
    policy_id: &str,
    file: Option<&Path>,
    text: Option<String>,
    language: Option<&str>,
    format: Format,
    extra: Option<&Path>,
) -> CandorResult<()> {
    let content = match (file, text) {
        (Some(path), _) => read_file(path)?,
        (None, Some(text)) => text,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CandorError::InvalidInput {
                    reason: format!("failed to read content from stdin: {e}"),
                })?;
            buf
        }
    };

    let catalog = Arc::new(load_catalog(extra)?);
    let validator = ComplianceValidator::new(catalog, Box::new(RegexRuleEvaluator::new()));
    let result = validator.validate(&content, policy_id, language)?;

    println!("{}", render(&Report::validation(policy_id, result), format)?);
    Ok(())
}

fn run_reconcile(
    documents: &Path,
    topic: Option<&str>,
    dedupe: bool,
    config: Option<&Path>,
    format: Format,
) -> CandorResult<()> {
    let raw = read_file(documents)?;
    let docs: Vec<SourceDocument> =
        serde_json::from_str(&raw).map_err(|e| CandorError::InvalidInput {
            reason: format!("failed to parse documents '{}': {e}", documents.display()),
        })?;

    let config = match config {
        Some(path) => DetectorConfig::from_file(path)?,
        None => DetectorConfig::default(),
    };
    let detector = ConflictDetector::new(config)?;

    let now = Utc::now();
    let classifier = KeywordClassifier::new();
    let sections: Vec<_> = docs.iter().map(|d| classifier.to_section(d, now)).collect();

    let mut conflicts = detector.detect(&sections, topic, now);
    if dedupe {
        conflicts = dedupe_by_topic(conflicts);
    }

    println!("{}", render(&Report::reconciliation(topic, conflicts), format)?);
    Ok(())
}

fn read_file(path: &Path) -> CandorResult<String> {
    std::fs::read_to_string(path).map_err(|e| CandorError::InvalidInput {
        reason: format!("failed to read '{}': {e}", path.display()),
    })
}
