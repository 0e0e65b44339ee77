//! Response normalization for decision extraction
//!
//! Model output drifts: fenced JSON, a wrapper object instead of a bare
//! list, rationale as one string instead of a list, alternatives as
//! objects instead of strings. The normalizer recognizes a closed set of
//! shapes in fixed precedence order and coerces each record toward the
//! schema before validation. Records that still fail validation are
//! dropped individually; the batch continues.

use crate::errors::{PrecedentError, Result};
use crate::types::DecisionRecord;
use serde_json::Value as JsonValue;
use tracing::warn;

/// Wrapper-object keys recognized as holding the record list, checked in order.
const RECORD_LIST_KEYS: [&str; 2] = ["decisions", "Decision Logs"];

/// Parse raw model output into validated decision records.
///
/// Fails only when the output is not JSON at all; every recognized shape
/// that contains no records yields an empty vector instead.
pub fn normalize_response(raw: &str, source_file: &str) -> Result<Vec<DecisionRecord>> {
    let cleaned = strip_code_fences(raw);
    let parsed: JsonValue = serde_json::from_str(cleaned.trim()).map_err(|e| {
        PrecedentError::ExtractionParseError(format!("model output is not valid JSON: {}", e))
    })?;

    let items = sniff_record_list(parsed);

    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        match build_record(item, source_file) {
            Ok(record) => records.push(record),
            Err(e) => {
                dropped += 1;
                warn!(source_file, error = %e, "dropping malformed decision record");
            }
        }
    }

    if dropped > 0 {
        warn!(
            source_file,
            dropped,
            kept = records.len(),
            "some extracted records failed validation"
        );
    }

    Ok(records)
}

/// Remove markdown code fences the model was told not to emit.
fn strip_code_fences(raw: &str) -> String {
    if raw.contains("```json") {
        raw.replace("```json", "").replace("```", "")
    } else if raw.contains("```") {
        raw.replace("```", "")
    } else {
        raw.to_string()
    }
}

/// Locate the record list inside whatever shape the model produced.
///
/// Precedence: bare list; wrapper object with a recognized key holding a
/// list; object that is itself a single record (has a title field); any
/// other object member holding a list, in key insertion order. Anything
/// else yields no records.
fn sniff_record_list(parsed: JsonValue) -> Vec<JsonValue> {
    let map = match parsed {
        JsonValue::Array(items) => return items,
        JsonValue::Object(map) => map,
        _ => return Vec::new(),
    };

    for key in RECORD_LIST_KEYS {
        if let Some(JsonValue::Array(items)) = map.get(key) {
            return items.clone();
        }
    }

    if map.contains_key("decision_title") || map.contains_key("title") {
        return vec![JsonValue::Object(map)];
    }

    for value in map.into_iter().map(|(_, v)| v) {
        if let JsonValue::Array(items) = value {
            return items;
        }
    }

    Vec::new()
}

/// Coerce one raw item into a validated record.
fn build_record(mut item: JsonValue, source_file: &str) -> Result<DecisionRecord> {
    let obj = match item.as_object_mut() {
        Some(obj) => obj,
        None => {
            return Err(PrecedentError::ValidationError(
                "record is not a JSON object".to_string(),
            ))
        }
    };

    obj.insert(
        "source_file".to_string(),
        JsonValue::String(source_file.to_string()),
    );

    if let Some(rationale) = obj.get_mut("rationale") {
        normalize_rationale(rationale);
    }
    if let Some(alternatives) = obj.get_mut("alternatives") {
        normalize_alternatives(alternatives);
    }

    let record: DecisionRecord = serde_json::from_value(item).map_err(|e| {
        PrecedentError::ValidationError(format!("record does not match schema: {}", e))
    })?;
    record.validate()?;
    Ok(record)
}

/// Rationale arrives as one string often enough to deserve coercion.
///
/// Bulleted text (any line break followed by a dash) is split into one
/// entry per non-empty line with bullet markers stripped; any other
/// string is wrapped whole as a single entry. An empty string is wrapped
/// too, and left for validation to reject.
fn normalize_rationale(value: &mut JsonValue) {
    let text = match value {
        JsonValue::String(text) => text,
        _ => return,
    };

    let entries: Vec<JsonValue> = if text.contains("\n-") {
        text.lines()
            .map(|line| line.trim_matches('-').trim())
            .filter(|line| !line.is_empty())
            .map(|line| JsonValue::String(line.to_string()))
            .collect()
    } else {
        vec![JsonValue::String(text.clone())]
    };

    *value = JsonValue::Array(entries);
}

/// Flatten structured alternatives into display strings.
///
/// Objects become `"<name>: <reason>"` from the `name` and
/// `reason_rejected` (or `description`) fields; other non-string values
/// are stringified as-is.
fn normalize_alternatives(value: &mut JsonValue) {
    let items = match value {
        JsonValue::Array(items) => items,
        _ => return,
    };

    for item in items.iter_mut() {
        match item {
            JsonValue::String(_) => {}
            JsonValue::Object(obj) => {
                let name = obj
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("Option");
                let reason = obj
                    .get("reason_rejected")
                    .or_else(|| obj.get("description"))
                    .and_then(JsonValue::as_str)
                    .unwrap_or("");
                *item = JsonValue::String(format!("{}: {}", name, reason));
            }
            ref other => {
                *item = JsonValue::String(other.to_string());
            }
        }
    }
}
