//! Gemini REST client
//!
//! Endpoint: POST {base}/v1beta/models/{model}:generateContent?key=...
//! Structured calls request `application/json` with a two-field schema.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::core::generative::{parse_structured, GenerationError, GenerativeService};
use crate::types::{GenerationConfig, PuzzleRecord};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini-backed generative service. No Debug: it holds the API key.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Build from config; None when generation is disabled
    pub fn from_config(config: &GenerationConfig) -> Result<Option<Self>, GenerationError> {
        let Some(api_key) = config.api_key.clone().filter(|_| config.enabled()) else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            http,
            base_url: GEMINI_BASE_URL.to_string(),
            model: config.model.clone(),
            api_key,
            timeout_ms: config.timeout.as_millis() as u64,
        }))
    }

    /// Point at a different host (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn call(&self, body: Value) -> Result<String, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_ms)
                } else {
                    GenerationError::Http(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.without_url().to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        debug!(model = %self.model, chars = text.len(), "gemini response received");
        Ok(text)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn generate_structured(&self, prompt: &str) -> Result<PuzzleRecord, GenerationError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "riddle": { "type": "STRING" },
                        "answer": { "type": "STRING" }
                    },
                    "required": ["riddle", "answer"]
                },
                "temperature": 1.0
            }
        });
        let text = self.call(body).await?;
        parse_structured(&text)
    }

    async fn generate_freeform(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.9 }
        });
        let text = self.call(body).await?;
        Ok(text.trim().to_string())
    }
}
