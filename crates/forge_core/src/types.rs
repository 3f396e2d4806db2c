use serde::{Deserialize, Serialize};

/// A generation request. Identity is the exact prompt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// What the pipeline produced for a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub preview_url: String,
    /// The backend stayed down and the static fallback payload was used.
    pub used_fallback: bool,
    /// Served from the cache without re-running the pipeline.
    pub cached: bool,
    /// Human-readable qualifier for degraded results.
    pub note: Option<String>,
}
