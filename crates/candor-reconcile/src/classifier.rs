//! Keyword-heuristic source classification.
//!
//! Classification order, first match wins:
//!
//! 1. A recognized `metadata.source_type` is returned verbatim.
//! 2. Otherwise every source type is scored by counting its lexicon hits in
//!    the title (×3) and the content (×1).
//! 3. The highest score wins; ties go to the earlier entry of
//!    `SourceType::PRIORITY`.  A document with no hits at all therefore
//!    classifies as official docs.
//!
//! The lexicon is literal keyword presence and nothing more.  Its accuracy
//! ceiling is accepted; what is guaranteed is determinism.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use candor_contracts::source::{Section, SourceDocument, SourceType};
use candor_core::traits::SourceClassifier;

const TITLE_WEIGHT: usize = 3;
const CONTENT_WEIGHT: usize = 1;

const LEXICON: &[(SourceType, &str)] = &[
    (SourceType::OfficialDocs, r"\bofficial\b"),
    (SourceType::OfficialDocs, r"\bspec(ification)?s?\b"),
    (SourceType::OfficialDocs, r"\bdocumentation\b"),
    (SourceType::OfficialDocs, r"\b(api|reference) (reference|guide)\b"),
    (SourceType::OfficialDocs, r"\brelease notes\b"),
    (SourceType::OfficialDocs, r"\bv\d+\.\d*"),
    (SourceType::Runbook, r"\brunbooks?\b"),
    (SourceType::Runbook, r"\btroubleshooting guide\b"),
    (SourceType::Runbook, r"\bplaybooks?\b"),
    (SourceType::Runbook, r"\bon-?call\b"),
    (SourceType::Runbook, r"\bescalation\b"),
    (SourceType::Wiki, r"\bwiki\b"),
    (SourceType::Wiki, r"\bconfluence\b"),
    (SourceType::Wiki, r"\bknowledge base\b"),
    (SourceType::Wiki, r"\bhow-?to\b"),
    (SourceType::Wiki, r"\bfaq\b"),
    (SourceType::TicketSystem, r"\btickets?\b"),
    (SourceType::TicketSystem, r"\bjira\b"),
    (SourceType::TicketSystem, r"\bissue #?\d+"),
    (SourceType::TicketSystem, r"\bbug report\b"),
    (SourceType::TicketSystem, r"\bassignee\b"),
    (SourceType::TicketSystem, r"\bresolved\b"),
    (SourceType::TeamChat, r"\bslack\b"),
    (SourceType::TeamChat, r"\bchat\b"),
    (SourceType::TeamChat, r"(^|\s)#[a-z][a-z0-9_-]+"),
    (SourceType::TeamChat, r"@(here|channel)\b"),
    (SourceType::TeamChat, r"\bthread\b"),
    (SourceType::MeetingNotes, r"\bmeetings?\b"),
    (SourceType::MeetingNotes, r"\bminutes\b"),
    (SourceType::MeetingNotes, r"\battendees\b"),
    (SourceType::MeetingNotes, r"\baction items?\b"),
    (SourceType::MeetingNotes, r"\bagenda\b"),
    (SourceType::MeetingNotes, r"\bstand-?up\b"),
    (SourceType::CodeComments, r"\btodo\b"),
    (SourceType::CodeComments, r"\bfixme\b"),
    (SourceType::CodeComments, r"\bhack\b"),
    (SourceType::CodeComments, r"(^|\s)//"),
    (SourceType::CodeComments, r"/\*"),
    (SourceType::PracticalLogs, r"\blogs?\b"),
    (SourceType::PracticalLogs, r"\bstack ?trace\b"),
    (SourceType::PracticalLogs, r"\btraceback\b"),
    (SourceType::PracticalLogs, r"\bexception\b"),
    (SourceType::PracticalLogs, r"\[(error|warn|info|debug)\]"),
    (SourceType::PracticalLogs, r"\d{4}-\d{2}-\d{2}[t ]\d{2}:\d{2}"),
];

static COMPILED_LEXICON: LazyLock<Vec<(SourceType, Regex)>> = LazyLock::new(|| {
    LEXICON
        .iter()
        .map(|(source_type, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}")).expect("lexicon patterns are valid");
            (*source_type, regex)
        })
        .collect()
});

/// Classifies documents by explicit metadata, then by keyword lexicon.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon score of every source type, in `SourceType::PRIORITY` order.
    pub fn scores(&self, doc: &SourceDocument) -> Vec<(SourceType, usize)> {
        SourceType::PRIORITY
            .into_iter()
            .map(|source_type| {
                let score = COMPILED_LEXICON
                    .iter()
                    .filter(|(t, _)| *t == source_type)
                    .map(|(_, regex)| {
                        regex.find_iter(&doc.title).count() * TITLE_WEIGHT
                            + regex.find_iter(&doc.content).count() * CONTENT_WEIGHT
                    })
                    .sum();
                (source_type, score)
            })
            .collect()
    }

    /// Build the `Section` for `doc`.
    ///
    /// The title becomes the topic.  The source name is the metadata channel,
    /// else the author, else the title.  Documents without a timestamp are
    /// dated `observed_at`.
    pub fn to_section(&self, doc: &SourceDocument, observed_at: DateTime<Utc>) -> Section {
        let metadata = doc.metadata.clone().unwrap_or_default();
        let source_name = metadata
            .channel
            .filter(|s| !s.trim().is_empty())
            .or(metadata.author.filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| doc.title.clone());

        Section {
            topic: doc.title.clone(),
            content: doc.content.clone(),
            source_type: self.classify(doc),
            source_name,
            timestamp: metadata.timestamp.unwrap_or(observed_at),
            url: metadata.url,
            domain: metadata.domain,
        }
    }
}

impl SourceClassifier for KeywordClassifier {
    fn classify(&self, doc: &SourceDocument) -> SourceType {
        if let Some(declared) = doc.metadata.as_ref().and_then(|m| m.source_type.as_deref()) {
            match declared.parse::<SourceType>() {
                Ok(source_type) => return source_type,
                Err(_) => debug!(declared, "ignoring unrecognized source type in metadata"),
            }
        }

        // `max_by_key` keeps the last maximum; scan in reverse priority so
        // the highest-priority type wins ties.
        let (source_type, score) = self
            .scores(doc)
            .into_iter()
            .rev()
            .max_by_key(|(_, score)| *score)
            .unwrap_or((SourceType::OfficialDocs, 0));

        debug!(title = %doc.title, %source_type, score, "classified document");
        source_type
    }
}
