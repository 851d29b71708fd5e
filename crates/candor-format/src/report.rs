//! The report envelope handed to presentation collaborators.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use candor_contracts::{conflict::Conflict, finding::ValidationResult};

/// What a report carries.  Serialized with a `kind` discriminator inside
/// `result`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportBody {
    Validation(ValidationResult),
    Reconciliation { conflicts: Vec<Conflict> },
}

/// One rendered answer: a fresh id, the time it was produced, and the
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub result: ReportBody,
}

impl Report {
    pub fn validation(policy_id: impl Into<String>, result: ValidationResult) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            policy_id: Some(policy_id.into()),
            topic: None,
            result: ReportBody::Validation(result),
        }
    }

    pub fn reconciliation(topic: Option<&str>, conflicts: Vec<Conflict>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            policy_id: None,
            topic: topic.map(str::to_string),
            result: ReportBody::Reconciliation { conflicts },
        }
    }

    /// Pin the timestamp, for reproducible output.
    pub fn at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}
