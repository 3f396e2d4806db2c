use thiserror::Error;

pub type LlmResult<T> = Result<T, LlmError>;

/// Errors from content acquisition.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key available. Surfaced to the operator, never papered over
    /// with fallback content.
    #[error("generation backend is not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    /// Rate limits, server errors, network failures. Safe to retry.
    #[error("transient backend failure: {0}")]
    Transient(String),

    /// The backend rejected the request. Retrying cannot help.
    #[error("backend rejected request (status {status}): {message}")]
    Terminal { status: u16, message: String },

    /// The backend answered but the body did not carry generated text.
    #[error("malformed backend response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Transient(_))
    }
}
