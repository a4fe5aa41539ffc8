//! Recovering JSON objects from chatty model replies.

use serde::de::DeserializeOwned;

use crate::error::LlmError;

/// Strip Markdown code fences and surrounding prose from a reply that should
/// contain a single JSON object.
pub fn unwrap_json(text: &str) -> String {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = rest.strip_prefix("json").or_else(|| rest.strip_prefix("JSON")).unwrap_or(rest);
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    let body = body.trim();

    if serde_json::from_str::<serde_json::Value>(body).is_ok() {
        return body.to_string();
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => body[start..=end].to_string(),
        _ => body.to_string(),
    }
}

pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let body = unwrap_json(text);
    serde_json::from_str(&body).map_err(|e| LlmError::InvalidJson(format!("{} in {:?}", e, body)))
}
