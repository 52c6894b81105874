//! Generative text capability: the trait every backend implements,
//! plus the decoders that turn raw service text into structured values.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::types::{Judgment, PuzzleRecord};

/// Anything that can go wrong talking to the generative service.
/// Always recoverable through a fallback path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("service returned an empty response")]
    Empty,
}

/// Opaque request/response text generator
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Produce a riddle/answer pair in the two-field schema
    async fn generate_structured(&self, prompt: &str) -> Result<PuzzleRecord, GenerationError>;

    /// Produce free-form text
    async fn generate_freeform(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Produce a judgment; the tag is decoded here so callers never see raw text
    async fn judge(&self, prompt: &str) -> Result<Judgment, GenerationError> {
        let text = self.generate_freeform(prompt).await?;
        Ok(parse_judgment(&text))
    }
}

pub type SharedGenerator = Arc<dyn GenerativeService>;

/// Run a generation future under a deadline; elapsed = Timeout error
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, GenerationError>
where
    F: Future<Output = Result<T, GenerationError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout(limit.as_millis() as u64)),
    }
}

lazy_static! {
    static ref RE_VERDICT_TAG: Regex = Regex::new(r"(?i)^\s*\[(correct|incorrect)\]\s*").unwrap();
    static ref RE_CODE_FENCE: Regex = Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap();
}

/// Decode a leading `[correct]` / `[incorrect]` tag
pub fn parse_judgment(text: &str) -> Judgment {
    let Some(caps) = RE_VERDICT_TAG.captures(text) else {
        return Judgment::Unparseable {
            raw: text.trim().to_string(),
        };
    };

    let tag_end = caps.get(0).map(|m| m.end()).unwrap_or(0);
    let reply = text[tag_end..].trim().to_string();

    if caps[1].eq_ignore_ascii_case("correct") {
        Judgment::Correct { reply }
    } else {
        Judgment::Incorrect { reply }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPuzzle {
    riddle: String,
    answer: String,
}

/// Strictly decode `{"riddle": ..., "answer": ...}`, tolerating a code fence
pub fn parse_structured(text: &str) -> Result<PuzzleRecord, GenerationError> {
    let body = match RE_CODE_FENCE.captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
        None => text.trim(),
    };
    if body.is_empty() {
        return Err(GenerationError::Empty);
    }

    let raw: RawPuzzle =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    let record = PuzzleRecord::new(raw.riddle.trim(), raw.answer.trim());
    if !record.is_usable() {
        return Err(GenerationError::Malformed("riddle or answer is blank".to_string()));
    }
    Ok(record)
}

// =============================================================================
// TESTS
// =============================================================================
