//! The generation pipeline, stage by stage.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use forge_artifact::ArtifactParser;
use forge_llm::Acquirer;
use forge_preview::PreviewSupervisor;
use forge_workspace::Materializer;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheEntry, GenerationCache};
use crate::error::{CoreError, CoreResult};
use crate::rate_limit::RateLimiter;
use crate::types::{GenerationOutcome, GenerationRequest};

/// Drives a request through acquire, parse, materialize, install, start.
///
/// The whole chain runs while holding the supervisor lock, so at most one
/// generation is in flight; concurrent requests queue behind it. Admission
/// control and the cache sit in front and never touch the workspace.
pub struct Coordinator {
    acquirer: Acquirer,
    parser: ArtifactParser,
    materializer: Arc<Materializer>,
    supervisor: tokio::sync::Mutex<PreviewSupervisor>,
    cache: Mutex<GenerationCache>,
    rate_limiter: Mutex<RateLimiter>,
    preview_url: String,
}

impl Coordinator {
    pub fn new(
        acquirer: Acquirer,
        materializer: Arc<Materializer>,
        supervisor: PreviewSupervisor,
        preview_url: impl Into<String>,
        min_request_interval: Duration,
    ) -> Self {
        Self {
            acquirer,
            parser: ArtifactParser::new(),
            materializer,
            supervisor: tokio::sync::Mutex::new(supervisor),
            cache: Mutex::new(GenerationCache::new()),
            rate_limiter: Mutex::new(RateLimiter::new(min_request_interval)),
            preview_url: preview_url.into(),
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().len()
    }

    /// Wall-clock time of the last admitted request.
    pub fn last_request_at(&self) -> Option<DateTime<Utc>> {
        self.rate_limiter.lock().last_admitted_at()
    }

    pub async fn handle(&self, request: GenerationRequest) -> CoreResult<GenerationOutcome> {
        if let Err(retry_after) = self.rate_limiter.lock().try_admit() {
            return Err(CoreError::RateLimited {
                retry_after_ms: retry_after.as_millis() as u64,
            });
        }

        if let Some(outcome) = self.cached_outcome(&request.prompt) {
            return Ok(outcome);
        }

        let mut supervisor = self.supervisor.lock().await;

        // A request that queued behind the lock may find its prompt served
        // by the generation that just finished.
        if let Some(outcome) = self.cached_outcome(&request.prompt) {
            return Ok(outcome);
        }

        info!(prompt_chars = request.prompt.len(), "starting generation pipeline");

        let acquired = self.acquirer.acquire(&request.prompt).await?;
        let artifacts = self.parser.parse(&acquired.text);
        debug!(artifacts = artifacts.len(), degraded = acquired.degraded, "response parsed");

        let generation = self.materializer.materialize(&artifacts)?;

        supervisor.install().await?;
        supervisor.start().await?;

        self.cache.lock().insert(
            request.prompt.clone(),
            CacheEntry {
                preview_url: self.preview_url.clone(),
                generation,
            },
        );

        let note = if acquired.degraded {
            Some("Generation backend unavailable, fallback project served".to_string())
        } else if artifacts.is_empty() {
            Some("Response contained no files, default project served".to_string())
        } else {
            None
        };

        Ok(GenerationOutcome {
            preview_url: self.preview_url.clone(),
            used_fallback: acquired.degraded,
            cached: false,
            note,
        })
    }

    fn cached_outcome(&self, prompt: &str) -> Option<GenerationOutcome> {
        let current = self.materializer.current_generation();
        let entry = self.cache.lock().get_valid(prompt, current)?;
        info!("serving cached generation");
        Some(GenerationOutcome {
            preview_url: entry.preview_url,
            used_fallback: false,
            cached: true,
            note: None,
        })
    }
}
