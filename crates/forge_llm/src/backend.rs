use async_trait::async_trait;

use crate::error::{LlmError, LlmResult};

/// A source of generated text.
///
/// Implementations receive the fully built prompt payload and return the raw
/// response text. Retry and fallback live above this seam, in the
/// [`Acquirer`](crate::Acquirer).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, payload: &str) -> LlmResult<String>;
}

/// Backend used when no credential is available.
///
/// Fails every call with [`LlmError::NotConfigured`] so the deployment
/// problem reaches the caller instead of being masked by fallback content.
pub struct UnconfiguredBackend;

#[async_trait]
impl GenerationBackend for UnconfiguredBackend {
    async fn generate(&self, _payload: &str) -> LlmResult<String> {
        Err(LlmError::NotConfigured)
    }
}
