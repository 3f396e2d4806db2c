//! Gemini generateContent client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::GenerationBackend;
use crate::error::{LlmError, LlmResult};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// HTTP client for the Gemini generateContent API.
pub struct GeminiBackend {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a backend from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> LlmResult<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(LlmError::NotConfigured),
        }
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL. Used to point tests at a local server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[async_trait::async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, payload: &str) -> LlmResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: payload.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, payload_len = payload.len(), "calling generation backend");

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transient(format!("network error: {e}")))?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Transient(format!(
                "backend returned {status}: {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Terminal {
                status: status.as_u16(),
                message: body,
            });
        }

        let result: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse body: {e}")))?;

        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| LlmError::InvalidResponse("no candidates in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_carries_model_and_key() {
        let backend = GeminiBackend::new("test-key").with_endpoint("http://127.0.0.1:9");
        let url = backend.request_url();
        assert_eq!(
            url,
            "http://127.0.0.1:9/models/gemini-1.5-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn custom_model_overrides_default() {
        let backend = GeminiBackend::new("key").with_model("gemini-1.5-pro");
        assert_eq!(backend.model(), "gemini-1.5-pro");
    }

    #[test]
    fn response_text_extraction() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);
        assert_eq!(text.as_deref(), Some("hello"));
    }

    #[test]
    fn empty_candidates_deserializes() {
        let parsed: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
