//! JSON rendering, checked against the published report schema.
//!
//! Every rendered document is validated before it is returned.  All schema
//! violations are collected into one `SchemaValidation` error so a broken
//! contract shows up in full, not one field at a time.

use tracing::{debug, warn};

use candor_contracts::error::{CandorError, CandorResult};

use crate::{report::Report, schema::report_schema};

/// Renders reports as JSON that satisfies [`report_schema`].
pub struct JsonFormatter {
    validator: jsonschema::Validator,
    pretty: bool,
}

impl JsonFormatter {
    /// Compile the report schema.  Pretty-printing is on by default.
    pub fn new() -> CandorResult<Self> {
        let validator =
            jsonschema::validator_for(&report_schema()).map_err(|e| CandorError::SchemaValidation {
                reason: format!("invalid report schema: {e}"),
            })?;
        Ok(Self {
            validator,
            pretty: true,
        })
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Check an already-serialized report against the schema.
    pub fn check(&self, value: &serde_json::Value) -> CandorResult<()> {
        let messages: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|error| format!("at '{}': {}", error.instance_path, error))
            .collect();

        if messages.is_empty() {
            return Ok(());
        }
        for message in &messages {
            warn!(%message, "report schema violation");
        }
        Err(CandorError::SchemaValidation {
            reason: messages.join("; "),
        })
    }

    pub fn render(&self, report: &Report) -> CandorResult<String> {
        let value = serde_json::to_value(report).map_err(|e| CandorError::SchemaValidation {
            reason: format!("failed to serialize report: {e}"),
        })?;
        self.check(&value)?;

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .map_err(|e| CandorError::SchemaValidation {
            reason: format!("failed to serialize report: {e}"),
        })?;

        debug!(report_id = %report.report_id, bytes = rendered.len(), "rendered JSON report");
        Ok(rendered)
    }
}
