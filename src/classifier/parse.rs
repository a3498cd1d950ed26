// Mapping raw model output to a ClassificationResult

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::classifier::ClassificationResult;
use crate::routing::RoutingTable;
use crate::types::{AppError, AppResult};

const FALLBACK_CONFIDENCE: f32 = 0.5;
const RECOVERED_SUMMARY: &str = "Classification failed - manual review required";

fn category_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""category"\s*:\s*"([^"]+)""#).expect("category pattern is a valid regex")
    })
}

/// Parse a model reply into a classification.
///
/// Known categories are returned in the table's spelling; unknown ones are
/// passed through for the router to default.
pub fn parse_classification(raw: &str, table: &RoutingTable) -> AppResult<ClassificationResult> {
    let cleaned = strip_code_fences(raw);

    let parsed = serde_json::from_str::<Value>(cleaned)
        .ok()
        .or_else(|| embedded_object(cleaned).and_then(|obj| serde_json::from_str(obj).ok()));

    match parsed {
        Some(Value::Object(map)) => {
            let category = map
                .get("category")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    warn!(?keys, "Model response has no category");
                    AppError::Parse("model response has no category field".to_string())
                })?;

            let confidence = match map.get("confidence").and_then(Value::as_f64) {
                Some(c) if (0.0..=1.0).contains(&c) => c as f32,
                other => {
                    warn!(confidence = ?other, "Invalid confidence, using {}", FALLBACK_CONFIDENCE);
                    FALLBACK_CONFIDENCE
                }
            };

            let summary = map
                .get("summary")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            Ok(ClassificationResult {
                category: canonical(category, table),
                confidence: Some(confidence),
                summary,
            })
        }
        _ => {
            let preview: String = raw.chars().take(500).collect();
            warn!(response = %preview, "Model response is not a JSON object");

            let category = category_pattern()
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    AppError::Parse("model response is not valid classification JSON".to_string())
                })?;

            info!(category, "Recovered category from malformed response");
            Ok(ClassificationResult {
                category: canonical(category, table),
                confidence: Some(FALLBACK_CONFIDENCE),
                summary: Some(RECOVERED_SUMMARY.to_string()),
            })
        }
    }
}

fn canonical(category: &str, table: &RoutingTable) -> String {
    table
        .canonical_category(category)
        .unwrap_or(category)
        .to_string()
}

/// Contents of a Markdown code fence, if the reply is wrapped in one
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();

    if let Some(open) = text.find("```json") {
        let start = open + "```json".len();
        if let Some(len) = text[start..].find("```") {
            if len > 0 {
                return text[start..start + len].trim();
            }
        }
    } else if let Some(open) = text.find("```") {
        let start = open + 3;
        if let Some(end) = text.rfind("```") {
            if end > start {
                return text[start..end].trim();
            }
        }
    }

    text
}

/// Outermost `{...}` span for replies that wrap JSON in prose
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
