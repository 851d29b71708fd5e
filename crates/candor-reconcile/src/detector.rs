//! Official-vs-practical conflict detection.
//!
//! Detection algorithm:
//!
//! 1. Optionally keep only sections that mention the requested topic.
//! 2. Split sections into official (official docs) and practical (the rest).
//! 3. For every (official, practical) pair, compute the Jaccard overlap of
//!    their significant words.  Pairs under `overlap_threshold` are
//!    unrelated and dropped.
//! 4. Grade divergence from the practical text: failure language or a
//!    numeric contradiction is high, a qualifier is medium, a soft
//!    contradiction marker is low.  No signal means agreement, which is not
//!    a conflict.
//! 5. Time-decay weights choose the recommendation, never the severity.
//!
//! Output is sorted by severity (highest first); pairs of equal severity
//! keep input order (official index, then practical index).

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use candor_contracts::{
    conflict::{Conflict, ConflictSeverity, Resolution},
    error::{CandorError, CandorResult},
    source::{DecayDomain, Section},
};

use crate::{
    decay::{age_days, decay_weight, HalfLives},
    text::{jaccard, numbers, numeric_contradiction, significant_words},
};

const FAILURE_MARKERS: &[&str] = &[
    r"\bcrash(es|ed|ing)?\b",
    r"\b(doesn['’]?t|does not|don['’]?t|do not|won['’]?t) work\b",
    r"\bnot working\b",
    r"\bbroken\b",
    r"\bbreaks\b",
    r"\bfail(s|ed|ing|ure|ures)?\b",
    r"\berrors?\b",
    r"\btime(s|d)? ?out\b",
    r"\btimeouts?\b",
    r"\boutages?\b",
    r"\bhangs\b",
    r"\bpanic(s|ked)?\b",
];

const QUALIFIER_MARKERS: &[&str] = &[
    r"\bsometimes\b",
    r"\bin practice\b",
    r"\bin reality\b",
    r"\busually\b",
    r"\boccasionally\b",
    r"\bintermittent(ly)?\b",
    r"\bnot always\b",
    r"\bdepends\b",
    r"\bmostly\b",
    r"\bworkaround\b",
    r"\bdeprecated\b",
    r"\bno longer\b",
];

const SOFT_MARKERS: &[&str] = &[
    r"\bactually\b",
    r"\binstead\b",
    r"\brather\b",
    r"\bprefer(red|s)?\b",
    r"\bturns out\b",
    r"\bwe use\b",
    r"\bbetter to\b",
];

fn compile_markers(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("marker patterns are valid"))
        .collect()
}

static FAILURE: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_markers(FAILURE_MARKERS));
static QUALIFIER: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_markers(QUALIFIER_MARKERS));
static SOFT: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_markers(SOFT_MARKERS));

fn any_marker(markers: &[Regex], text: &str) -> bool {
    markers.iter().any(|m| m.is_match(text))
}

// ── Configuration ────────────────────────────────────────────────────────────

/// Tunables for conflict detection.
///
/// ```toml
/// overlap_threshold = 0.2
/// stale_weight = 0.5
/// default_domain = "engineering"
///
/// [half_lives]
/// engineering = 90.0
/// policy = 365.0
/// incident = 30.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum Jaccard overlap for two sections to be on the same topic.
    pub overlap_threshold: f64,
    /// A source whose decay weight falls below this is stale.
    pub stale_weight: f64,
    /// Decay domain for sections that do not name one.
    pub default_domain: DecayDomain,
    pub half_lives: HalfLives,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.2,
            stale_weight: 0.5,
            default_domain: DecayDomain::Engineering,
            half_lives: HalfLives::default(),
        }
    }
}

impl DetectorConfig {
    /// Parse `s` as TOML; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> CandorResult<Self> {
        let config: DetectorConfig = toml::from_str(s).map_err(|e| CandorError::ConfigError {
            reason: format!("failed to parse detector TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CandorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CandorError::ConfigError {
            reason: format!("failed to read detector config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject thresholds outside `[0, 1]` and non-positive half-lives.
    pub fn validate(&self) -> CandorResult<()> {
        for (name, value) in [
            ("overlap_threshold", self.overlap_threshold),
            ("stale_weight", self.stale_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CandorError::ConfigError {
                    reason: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        for domain in [DecayDomain::Engineering, DecayDomain::Policy, DecayDomain::Incident] {
            let half_life = self.half_lives.get(domain);
            if !(half_life.is_finite() && half_life > 0.0) {
                return Err(CandorError::ConfigError {
                    reason: format!("half-life for {domain:?} must be a positive number of days, got {half_life}"),
                });
            }
        }
        Ok(())
    }
}

// ── Detector ─────────────────────────────────────────────────────────────────

/// Per-section data computed once per detection pass.
struct Prepared<'a> {
    section: &'a Section,
    words: BTreeSet<String>,
    numbers: BTreeSet<String>,
    weight: f64,
}

/// Detects disagreements between official docs and practical sources.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    config: DetectorConfig,
}

impl ConflictDetector {
    pub fn new(config: DetectorConfig) -> CandorResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Find conflicts among `sections`, ageing them relative to `now`.
    ///
    /// With `topic`, only sections whose topic or content mentions it
    /// (case-insensitively) take part, and every conflict carries that topic.
    pub fn detect(
        &self,
        sections: &[Section],
        topic: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<Conflict> {
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());
        let needle = topic.map(str::to_lowercase);

        let (official, practical): (Vec<Prepared<'_>>, Vec<Prepared<'_>>) = sections
            .iter()
            .filter(|s| match &needle {
                Some(n) => s.topic.to_lowercase().contains(n) || s.content.to_lowercase().contains(n),
                None => true,
            })
            .map(|s| self.prepare(s, now))
            .partition(|p| p.section.source_type.is_official());

        debug!(
            official = official.len(),
            practical = practical.len(),
            topic = topic.unwrap_or("*"),
            "detecting conflicts"
        );

        let mut conflicts = Vec::new();
        for o in &official {
            for p in &practical {
                let overlap = jaccard(&o.words, &p.words);
                if overlap < self.config.overlap_threshold {
                    continue;
                }
                let Some(severity) = divergence(o, p) else {
                    debug!(
                        official = %o.section.source_name,
                        practical = %p.section.source_name,
                        overlap,
                        "related sections agree"
                    );
                    continue;
                };
                conflicts.push(self.conflict(o, p, topic, severity, overlap));
            }
        }

        conflicts.sort_by(|a, b| b.severity.cmp(&a.severity));
        info!(count = conflicts.len(), "conflict detection complete");
        conflicts
    }

    fn prepare<'a>(&self, section: &'a Section, now: DateTime<Utc>) -> Prepared<'a> {
        let domain = section.domain.unwrap_or(self.config.default_domain);
        let half_life = self.config.half_lives.get(domain);
        Prepared {
            section,
            words: significant_words(&format!("{} {}", section.topic, section.content)),
            numbers: numbers(&section.content),
            weight: decay_weight(age_days(section.timestamp, now), half_life),
        }
    }

    fn conflict(
        &self,
        o: &Prepared<'_>,
        p: &Prepared<'_>,
        topic: Option<&str>,
        severity: ConflictSeverity,
        overlap: f64,
    ) -> Conflict {
        let official_stale = o.weight < self.config.stale_weight;
        let practical_stale = p.weight < self.config.stale_weight;

        let resolution = if !official_stale && !practical_stale {
            Resolution::ReconcileBoth
        } else if p.weight >= o.weight {
            Resolution::PreferPractical
        } else {
            Resolution::PreferOfficial
        };

        let (o_src, p_src) = (&o.section.source_name, &p.section.source_name);
        let recommendation = match resolution {
            Resolution::PreferPractical => format!(
                "Follow the practical answer from {p_src}; it is fresher for its domain \
                 (weight {:.2} vs {:.2}). Update the official documentation from {o_src}.",
                p.weight, o.weight
            ),
            Resolution::PreferOfficial => format!(
                "Follow the official answer from {o_src}, but verify against recent practice \
                 reported by {p_src} (weight {:.2} vs {:.2}).",
                o.weight, p.weight
            ),
            Resolution::ReconcileBoth => format!(
                "Both sources are current (weight {:.2} vs {:.2}). Keep the official answer from \
                 {o_src} and the observed behaviour from {p_src} side by side until their owners \
                 reconcile them.",
                o.weight, p.weight
            ),
        };

        let topic = topic
            .map(str::to_string)
            .or_else(|| Some(o.section.topic.clone()).filter(|t| !t.trim().is_empty()))
            .unwrap_or_else(|| p.section.topic.clone());

        Conflict {
            topic,
            official_answer: o.section.content.clone(),
            official_source: o_src.clone(),
            practical_answer: p.section.content.clone(),
            practical_source: p_src.clone(),
            severity,
            recommendation,
            resolution,
            official_weight: o.weight,
            practical_weight: p.weight,
            overlap,
        }
    }
}

/// Grade how the practical section diverges from the official one.
fn divergence(official: &Prepared<'_>, practical: &Prepared<'_>) -> Option<ConflictSeverity> {
    let text = &practical.section.content;
    if any_marker(&FAILURE, text) || numeric_contradiction(&official.numbers, &practical.numbers) {
        Some(ConflictSeverity::High)
    } else if any_marker(&QUALIFIER, text) {
        Some(ConflictSeverity::Medium)
    } else if any_marker(&SOFT, text) {
        Some(ConflictSeverity::Low)
    } else {
        None
    }
}

/// Keep one conflict per topic (case-insensitive): the most severe, the
/// earliest on ties.  Output follows first appearance of each topic.
pub fn dedupe_by_topic(conflicts: Vec<Conflict>) -> Vec<Conflict> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Conflict> = Vec::new();

    for conflict in conflicts {
        let key = conflict.topic.trim().to_lowercase();
        match slots.get(&key) {
            Some(&i) => {
                if conflict.severity > out[i].severity {
                    out[i] = conflict;
                }
            }
            None => {
                slots.insert(key, out.len());
                out.push(conflict);
            }
        }
    }
    out
}
