//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use forge_core::Coordinator;
use forge_llm::{Acquirer, FallbackPolicy, GeminiBackend, GenerationBackend, UnconfiguredBackend};
use forge_preview::{PreviewConfig, PreviewSupervisor};
use forge_workspace::Materializer;
use tracing::warn;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub materializer: Arc<Materializer>,
    pub llm_configured: bool,
}

impl AppState {
    pub fn build(config: &ServerConfig) -> Self {
        let llm_configured = config.llm_configured();
        let backend: Arc<dyn GenerationBackend> = if llm_configured {
            Arc::new(GeminiBackend::new(
                config.gemini_api_key.clone().unwrap_or_default(),
            ))
        } else {
            warn!("GEMINI_API_KEY not set, generation requests will fail until configured");
            Arc::new(UnconfiguredBackend)
        };

        let fallback_policy = if config.propagate_generation_errors {
            FallbackPolicy::PropagateError
        } else {
            FallbackPolicy::SubstituteFallback
        };
        let acquirer = Acquirer::new(backend).with_fallback_policy(fallback_policy);

        let materializer = Arc::new(Materializer::new(&config.workspace_dir));
        let supervisor = PreviewSupervisor::new(
            materializer.root(),
            PreviewConfig::new(config.preview_port),
        );

        let coordinator = Arc::new(Coordinator::new(
            acquirer,
            Arc::clone(&materializer),
            supervisor,
            config.preview_url(),
            Duration::from_millis(config.min_request_interval_ms),
        ));

        Self {
            coordinator,
            materializer,
            llm_configured,
        }
    }
}
