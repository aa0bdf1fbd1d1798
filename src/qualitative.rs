//! External qualitative-analysis collaborator
//!
//! The engine can ask an external reviewer (an LLM endpoint) for a prose
//! assessment of the text. The result is advisory only: it never feeds the
//! numeric composite, and any failure or timeout degrades to a placeholder
//! rather than failing the scoring request.
//!
//! The HTTP client requires the `ai` feature:
//! ```toml
//! prosemeter = { version = "0.3", features = ["ai"] }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prose assessment from the external collaborator.
///
/// `overall_impression` is the reviewer's own 0-100 judgment and is reported
/// verbatim; it is not blended into the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeAnalysis {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    pub overall_impression: u8,
    /// Set when this is a degraded placeholder rather than a real review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QualitativeAnalysis {
    /// Neutral stand-in used when the collaborator times out or errors.
    pub fn placeholder(reason: impl Into<String>) -> Self {
        Self {
            summary: "Qualitative analysis unavailable".to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            overall_impression: 50,
            error: Some(reason.into()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// Error from the qualitative collaborator
#[derive(Debug, Error)]
pub enum QualitativeError {
    #[error("ANTHROPIC_API_KEY environment variable not set")]
    NoApiKey,
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited - try again later")]
    RateLimited,
    #[error("API error: {0}")]
    ApiError(String),
}

/// A source of qualitative reviews. Implementations must be shareable across
/// threads; the engine calls `review` from a worker thread so it can race the
/// analyzers and enforce its timeout.
pub trait QualitativeAnalyzer: Send + Sync {
    fn review(&self, text: &str) -> Result<QualitativeAnalysis, QualitativeError>;
}

/// HTTP client for an LLM review endpoint
#[allow(dead_code)]
pub struct HttpQualitativeClient {
    api_key: String,
    model: String,
    base_url: String,
}

impl HttpQualitativeClient {
    /// Create a client using ANTHROPIC_API_KEY from the environment
    pub fn from_env() -> Result<Self, QualitativeError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| QualitativeError::NoApiKey)?;

        Ok(Self::with_key(api_key))
    }

    /// Create a client with a specific API key
    pub fn with_key(api_key: String) -> Self {
        Self {
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com/v1/messages".to_string(),
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point the client at a different endpoint
    pub fn endpoint(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    #[cfg(feature = "ai")]
    fn build_prompt(text: &str) -> String {
        format!(
            "You are an experienced writing reviewer. Assess the following text and \
             respond with ONLY a JSON object with these fields: \"summary\" (2-3 \
             sentences), \"strengths\" (array of strings), \"improvements\" (array of \
             strings), \"overallImpression\" (integer 0-100).\n\nText:\n{}",
            text
        )
    }

    /// Send the review request to the endpoint
    #[cfg(feature = "ai")]
    fn send_request(&self, text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
        use serde_json::json;

        let client = reqwest::blocking::Client::new();

        let body = json!({
            "model": self.model,
            "max_tokens": 1024,
            "messages": [
                {
                    "role": "user",
                    "content": Self::build_prompt(text)
                }
            ]
        });

        let response = client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .map_err(|e| QualitativeError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QualitativeError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(QualitativeError::ApiError(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| QualitativeError::InvalidResponse(e.to_string()))?;

        let content = json["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|item| item["text"].as_str())
            .ok_or_else(|| {
                QualitativeError::InvalidResponse("No content in response".to_string())
            })?;

        parse_review(content)
    }

    /// Stub implementation when the ai feature is disabled
    #[cfg(not(feature = "ai"))]
    fn send_request(&self, _text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
        Err(QualitativeError::RequestFailed(
            "AI feature not enabled. Rebuild with: cargo build --features ai".to_string(),
        ))
    }
}

impl QualitativeAnalyzer for HttpQualitativeClient {
    fn review(&self, text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
        self.send_request(text)
    }
}

/// Parse the model's reply into a review. Tolerates prose or code fences
/// around the JSON object.
#[cfg_attr(not(feature = "ai"), allow(dead_code))]
fn parse_review(content: &str) -> Result<QualitativeAnalysis, QualitativeError> {
    let start = content
        .find('{')
        .ok_or_else(|| QualitativeError::InvalidResponse("No JSON object in reply".to_string()))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| QualitativeError::InvalidResponse("Unterminated JSON object".to_string()))?;
    if end < start {
        return Err(QualitativeError::InvalidResponse(
            "Malformed JSON object".to_string(),
        ));
    }

    let mut analysis: QualitativeAnalysis = serde_json::from_str(&content[start..=end])
        .map_err(|e| QualitativeError::InvalidResponse(e.to_string()))?;
    analysis.error = None;
    Ok(analysis)
}

/// Check if the AI feature is compiled in
pub fn is_ai_available() -> bool {
    cfg!(feature = "ai")
}
