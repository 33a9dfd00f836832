//! Decoding model output into typed content.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::GeneratedResponse;

/// Substitute content used when the model output could not be used as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback<T> {
    pub content: T,
    /// Why the model output was rejected
    pub reason: String,
}

/// Parsed model output, or the fallback that replaces it.
pub type Generation<T> = Result<T, Fallback<T>>;

impl<T: Serialize> From<Generation<T>> for GeneratedResponse<T> {
    fn from(generation: Generation<T>) -> Self {
        match generation {
            Ok(content) => GeneratedResponse {
                content,
                fallback: false,
            },
            Err(fallback) => GeneratedResponse {
                content: fallback.content,
                fallback: true,
            },
        }
    }
}

/// Trim the text and remove a surrounding markdown code fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    let inner = inner.trim();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Deserialize model output, tolerating a code fence around the JSON.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text))
}

/// Parse model output, building the fallback from the raw text on failure.
pub fn parse_or_fallback<T, F>(feature: &str, text: &str, fallback: F) -> Generation<T>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> T,
{
    parse_json(text).map_err(|e| reject(feature, text, e.to_string(), fallback))
}

/// Build a [`Fallback`] and log why the model output was rejected.
pub fn reject<T, F>(feature: &str, text: &str, reason: String, fallback: F) -> Fallback<T>
where
    F: FnOnce(&str) -> T,
{
    tracing::warn!(
        "Unusable model output for {}: {} ({} chars)",
        feature,
        reason,
        text.len()
    );
    Fallback {
        content: fallback(text),
        reason,
    }
}

static TITLE_FIELD: LazyLock<Option<Regex>> = LazyLock::new(|| field_pattern("title"));
static CONTENT_FIELD: LazyLock<Option<Regex>> = LazyLock::new(|| field_pattern("content"));

/// `key`, then any quotes or whitespace around a colon, then the value up to the next quote.
fn field_pattern(key: &str) -> Option<Regex> {
    Regex::new(&format!(r#"{}["\s]*:["\s]*([^"]+)"#, regex::escape(key))).ok()
}

/// Pull the first `key: "value"` pair out of text that is not valid JSON.
pub fn extract_field(text: &str, key: &str) -> Option<String> {
    let built;
    let pattern = match key {
        "title" => TITLE_FIELD.as_ref()?,
        "content" => CONTENT_FIELD.as_ref()?,
        _ => {
            built = field_pattern(key)?;
            &built
        }
    };
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().to_string())
}
