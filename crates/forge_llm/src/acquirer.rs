//! Acquisition front door: retry, then fallback policy.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::GenerationBackend;
use crate::error::{LlmError, LlmResult};
use crate::fallback::FALLBACK_RESPONSE;
use crate::prompt;
use crate::retry::RetryPolicy;

/// What to do when every retry attempt has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Serve the static fallback payload and mark the result degraded.
    #[default]
    SubstituteFallback,
    /// Surface the final backend error to the caller.
    PropagateError,
}

/// Generated text plus whether it came from the fallback payload.
#[derive(Debug, Clone)]
pub struct AcquiredContent {
    pub text: String,
    pub degraded: bool,
}

/// Wraps a [`GenerationBackend`] with the retry schedule and the
/// exhaustion policy.
pub struct Acquirer {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryPolicy,
    fallback: FallbackPolicy,
}

impl Acquirer {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fallback_policy(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Build the full payload for `user_prompt` and acquire generated text.
    ///
    /// A missing credential always propagates: an unconfigured deployment is
    /// an operator problem, not something to mask with fallback content.
    pub async fn acquire(&self, user_prompt: &str) -> LlmResult<AcquiredContent> {
        let payload = prompt::build_prompt(user_prompt);

        let outcome = self
            .retry
            .run(|| {
                let payload = payload.clone();
                let backend = Arc::clone(&self.backend);
                async move { backend.generate(&payload).await }
            })
            .await;

        match outcome {
            Ok(text) => {
                info!(chars = text.len(), "acquired generated content");
                Ok(AcquiredContent {
                    text,
                    degraded: false,
                })
            }
            Err(LlmError::NotConfigured) => Err(LlmError::NotConfigured),
            Err(err) => match self.fallback {
                FallbackPolicy::SubstituteFallback => {
                    warn!(error = %err, "acquisition exhausted, substituting fallback payload");
                    Ok(AcquiredContent {
                        text: FALLBACK_RESPONSE.to_string(),
                        degraded: true,
                    })
                }
                FallbackPolicy::PropagateError => Err(err),
            },
        }
    }
}
