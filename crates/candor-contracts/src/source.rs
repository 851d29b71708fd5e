//! Knowledge sources: raw documents, their classification, and sections.
//!
//! The knowledge-store collaborator hands over `SourceDocument`s.  The
//! classifier labels each one with a `SourceType` and turns it into a
//! `Section`, which lives only for one conflict-detection pass.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CandorError;

/// Closed classification of where a piece of knowledge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    OfficialDocs,
    PracticalLogs,
    TeamChat,
    CodeComments,
    TicketSystem,
    Runbook,
    Wiki,
    MeetingNotes,
}

impl SourceType {
    /// Tie-break order for classification, most authoritative first.
    pub const PRIORITY: [SourceType; 8] = [
        SourceType::OfficialDocs,
        SourceType::Runbook,
        SourceType::Wiki,
        SourceType::TicketSystem,
        SourceType::TeamChat,
        SourceType::MeetingNotes,
        SourceType::CodeComments,
        SourceType::PracticalLogs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::OfficialDocs => "official-docs",
            SourceType::PracticalLogs => "practical-logs",
            SourceType::TeamChat => "team-chat",
            SourceType::CodeComments => "code-comments",
            SourceType::TicketSystem => "ticket-system",
            SourceType::Runbook => "runbook",
            SourceType::Wiki => "wiki",
            SourceType::MeetingNotes => "meeting-notes",
        }
    }

    /// Official documentation is the only non-practical source.
    pub fn is_official(self) -> bool {
        self == SourceType::OfficialDocs
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = CandorError;

    /// Accepts the kebab-case wire names, case-insensitively, with `_` or
    /// spaces in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        SourceType::PRIORITY
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CandorError::InvalidInput {
                reason: format!("unrecognized source type '{s}'"),
            })
    }
}

/// Freshness budget family for time-decay weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecayDomain {
    /// Engineering docs, APIs, infrastructure: 90-day half-life.
    #[default]
    Engineering,
    /// Policy and HR material: 365-day half-life.
    Policy,
    /// Incident reports and postmortems: 30-day half-life.
    Incident,
}

impl DecayDomain {
    pub fn default_half_life_days(self) -> f64 {
        match self {
            DecayDomain::Engineering => 90.0,
            DecayDomain::Policy => 365.0,
            DecayDomain::Incident => 30.0,
        }
    }
}

/// Metadata the knowledge store attaches to a document.  Every field is
/// optional; an explicit, recognized `source_type` overrides classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub domain: Option<DecayDomain>,
}

/// A raw document as supplied by the knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub metadata: Option<DocumentMetadata>,
    pub title: String,
    pub content: String,
}

/// A classified piece of knowledge on one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub topic: String,
    pub content: String,
    pub source_type: SourceType,
    pub source_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Decay domain override; the detector's default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DecayDomain>,
}
