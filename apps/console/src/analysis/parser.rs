use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::fences::strip_fences;

/// Field names the screening model is prompted to emit. The camelCase
/// spelling of the patterns list shows up in some responses too.
const INCONSISTENCIES: &str = "inconsistencies";
const SUSPICIOUS_PATTERNS: &[&str] = &["suspicious_patterns", "suspiciousPatterns"];
const SUMMARY: &str = "summary";

/// Display-ready form of a resume's analysis text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedAnalysis {
    Structured {
        inconsistencies: Vec<String>,
        suspicious_patterns: Vec<String>,
        summary: String,
    },
    /// The analysis did not carry the expected JSON shape; shown as-is.
    Unparsed { text: String },
}

/// Interprets raw analysis text. Total: any input yields a value, and the
/// `Unparsed` fallback always carries `raw` verbatim.
pub fn parse(raw: &str) -> ParsedAnalysis {
    structured(raw).unwrap_or_else(|| ParsedAnalysis::Unparsed {
        text: raw.to_string(),
    })
}

fn structured(raw: &str) -> Option<ParsedAnalysis> {
    // Bare JSON first, so fence markers inside string values stay intact.
    let value: Value = serde_json::from_str(raw.trim())
        .or_else(|_| serde_json::from_str(strip_fences(raw)))
        .ok()?;
    let object = value.as_object()?;

    let has_known_field = object.contains_key(INCONSISTENCIES)
        || object.contains_key(SUMMARY)
        || SUSPICIOUS_PATTERNS.iter().any(|key| object.contains_key(*key));
    if !has_known_field {
        return None;
    }

    Some(ParsedAnalysis::Structured {
        inconsistencies: string_list(object.get(INCONSISTENCIES))?,
        suspicious_patterns: string_list(first_present(object, SUSPICIOUS_PATTERNS))?,
        summary: text_field(object.get(SUMMARY))?,
    })
}

/// First key that maps to a non-null value; snake_case wins when both are set.
fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// `None` means a shape mismatch; missing or null reads as an empty list.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(_) => None,
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => None,
    }
}
