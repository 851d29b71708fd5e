//! JSON Schema documents for the published payloads.
//!
//! Field names here are the wire contract: a rename in `candor-contracts`
//! that is not mirrored here fails rendering instead of reaching a consumer.

use serde_json::{json, Value};

const UUID_PATTERN: &str =
    "^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

pub fn finding_schema() -> Value {
    json!({
        "type": "object",
        "required": ["ruleId", "ruleName", "severity", "description", "remediation"],
        "additionalProperties": false,
        "properties": {
            "ruleId": { "type": "string", "minLength": 1 },
            "ruleName": { "type": "string" },
            "severity": { "enum": ["critical", "high", "medium", "low"] },
            "description": { "type": "string" },
            "remediation": { "type": "string" },
            "location": {
                "type": "object",
                "required": ["line", "column"],
                "additionalProperties": false,
                "properties": {
                    "line": { "type": "integer", "minimum": 1 },
                    "column": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
}

/// `ValidationResult`, plus the `kind` tag the report envelope adds.
pub fn validation_result_schema() -> Value {
    json!({
        "type": "object",
        "required": ["kind", "compliant", "score", "violations", "warnings", "recommendations"],
        "additionalProperties": false,
        "properties": {
            "kind": { "const": "validation" },
            "compliant": { "type": "boolean" },
            "score": { "type": "integer", "minimum": 0, "maximum": 100 },
            "violations": {
                "type": "array",
                "items": {
                    "allOf": [
                        finding_schema(),
                        { "properties": { "severity": { "enum": ["critical", "high"] } } }
                    ]
                }
            },
            "warnings": {
                "type": "array",
                "items": {
                    "allOf": [
                        finding_schema(),
                        { "properties": { "severity": { "enum": ["medium", "low"] } } }
                    ]
                }
            },
            "recommendations": { "type": "array", "items": { "type": "string" } }
        }
    })
}

pub fn conflict_schema() -> Value {
    let weight = json!({ "type": "number", "minimum": 0, "maximum": 1 });
    json!({
        "type": "object",
        "required": [
            "topic", "officialAnswer", "officialSource", "practicalAnswer",
            "practicalSource", "severity", "recommendation", "resolution",
            "officialWeight", "practicalWeight", "overlap"
        ],
        "additionalProperties": false,
        "properties": {
            "topic": { "type": "string" },
            "officialAnswer": { "type": "string" },
            "officialSource": { "type": "string" },
            "practicalAnswer": { "type": "string" },
            "practicalSource": { "type": "string" },
            "severity": { "enum": ["high", "medium", "low"] },
            "recommendation": { "type": "string", "minLength": 1 },
            "resolution": { "enum": ["prefer-practical", "prefer-official", "reconcile-both"] },
            "officialWeight": weight.clone(),
            "practicalWeight": weight.clone(),
            "overlap": weight
        }
    })
}

/// The full `Report` envelope.
pub fn report_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "CANDOR report",
        "type": "object",
        "required": ["reportId", "generatedAt", "result"],
        "additionalProperties": false,
        "properties": {
            "reportId": { "type": "string", "pattern": UUID_PATTERN },
            "generatedAt": { "type": "string", "minLength": 1 },
            "policyId": { "type": "string", "minLength": 1 },
            "topic": { "type": "string" },
            "result": {
                "oneOf": [
                    validation_result_schema(),
                    {
                        "type": "object",
                        "required": ["kind", "conflicts"],
                        "additionalProperties": false,
                        "properties": {
                            "kind": { "const": "reconciliation" },
                            "conflicts": { "type": "array", "items": conflict_schema() }
                        }
                    }
                ]
            }
        }
    })
}
