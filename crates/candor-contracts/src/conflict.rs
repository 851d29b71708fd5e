//! Conflicts between official and practical knowledge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How strongly the practical source contradicts the official one.
///
/// Declared ascending so the derived `Ord` ranks `High` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    /// Stylistic difference only ("actually", "instead").
    Low,
    /// Qualified disagreement ("sometimes", "in practice").
    Medium,
    /// Explicit failure language or a numeric contradiction.
    High,
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictSeverity::Low => "low",
            ConflictSeverity::Medium => "medium",
            ConflictSeverity::High => "high",
        })
    }
}

/// Which answer the recency weighting favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// The practical source is at least as fresh as the official one, and
    /// at least one of them is stale.
    PreferPractical,
    /// The official source is fresher; it should still be verified against
    /// recent practice.
    PreferOfficial,
    /// Neither source is stale; both answers are surfaced.
    ReconcileBoth,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resolution::PreferPractical => "prefer-practical",
            Resolution::PreferOfficial => "prefer-official",
            Resolution::ReconcileBoth => "reconcile-both",
        })
    }
}

/// A detected disagreement between an official and a practical source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub topic: String,
    pub official_answer: String,
    pub official_source: String,
    pub practical_answer: String,
    pub practical_source: String,
    pub severity: ConflictSeverity,
    pub recommendation: String,
    pub resolution: Resolution,
    pub official_weight: f64,
    pub practical_weight: f64,
    /// Jaccard similarity of the two sections' significant words.
    pub overlap: f64,
}
