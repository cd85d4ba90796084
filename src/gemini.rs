//! Generative-model transport.
//!
//! [`RecipeModel`] is the seam between the discovery/parsing clients and the
//! actual model: production uses [`GeminiClient`] against the Gemini REST
//! API, tests substitute a canned implementation.
//!
//! The model's reply is free-form text that is usually, but not always, JSON
//! wrapped in markdown code fences. Callers strip fences with
//! [`strip_code_fences`] and parse the remainder themselves.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Placeholder value shipped in example env files; treated as unconfigured.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Default Gemini model name.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Errors from the model transport.
#[derive(Debug)]
pub enum ModelError {
    /// Network-level failure.
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The API answered successfully but produced no text.
    EmptyResponse,
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Http(e) => write!(f, "Model request failed: {}", e),
            ModelError::Api { status, body } => {
                write!(f, "Model API error {}: {}", status, body)
            }
            ModelError::EmptyResponse => write!(f, "Model returned no text"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        ModelError::Http(e)
    }
}

/// A generative model that turns a prompt into reply text.
#[async_trait]
pub trait RecipeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Gemini REST client (`models/<model>:generateContent`).
///
/// No retry and no explicit timeout: a single failure surfaces directly, and
/// the request blocks as long as reqwest's defaults allow.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (used by tests against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RecipeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(ModelError::Api { status, body });
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text = reply
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Removes markdown code-fence markers ("```json" and "```") from model
/// output and trims the remainder.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fenced_json_block() {
        let text = "```json\n[{\"title\": \"Soup\"}]\n```";
        assert_eq!(strip_code_fences(text), "[{\"title\": \"Soup\"}]");
    }

    #[test]
    fn test_strip_bare_fences() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_text_only_trimmed() {
        assert_eq!(strip_code_fences("  [1, 2]  \n"), "[1, 2]");
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "Hello, "}, {"text": "world"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;

        let reply: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: String = reply.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "Hello, world");
    }

    #[test]
    fn test_response_without_candidates() {
        let reply: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(reply.candidates.is_empty());
    }
}
