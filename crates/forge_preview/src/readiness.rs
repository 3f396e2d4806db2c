//! Readiness polling for the preview URL.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Where a client should point its preview iframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    /// The dev server answered within the budget.
    DevServer(String),
    /// The dev server never answered; serve the raw workspace files.
    StaticFallback(String),
}

impl PreviewTarget {
    pub fn url(&self) -> &str {
        match self {
            PreviewTarget::DevServer(url) | PreviewTarget::StaticFallback(url) => url,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PreviewTarget::StaticFallback(_))
    }
}

/// Polls the preview URL until it answers or the budget runs out.
///
/// Any HTTP status below 500 counts as reachable: a dev server that is up
/// but still compiling typically 404s, which is good enough to point an
/// iframe at.
pub struct ReadinessPoller {
    client: reqwest::Client,
    preview_url: String,
    fallback_url: String,
    budget: Duration,
    interval: Duration,
}

impl ReadinessPoller {
    pub fn new(preview_url: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap_or_default();
        Self {
            client,
            preview_url: preview_url.into(),
            fallback_url: fallback_url.into(),
            budget: Duration::from_secs(30),
            interval: Duration::from_secs(1),
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn wait_for_preview(&self) -> PreviewTarget {
        let deadline = Instant::now() + self.budget;
        loop {
            match self.client.get(&self.preview_url).send().await {
                Ok(response) if response.status().as_u16() < 500 => {
                    info!(url = %self.preview_url, status = %response.status(), "preview is reachable");
                    return PreviewTarget::DevServer(self.preview_url.clone());
                }
                Ok(response) => {
                    debug!(url = %self.preview_url, status = %response.status(), "preview answered with server error");
                }
                Err(err) => {
                    debug!(url = %self.preview_url, error = %err, "preview not reachable yet");
                }
            }
            if Instant::now() + self.interval > deadline {
                warn!(
                    url = %self.preview_url,
                    fallback = %self.fallback_url,
                    "preview never became reachable, using static fallback"
                );
                return PreviewTarget::StaticFallback(self.fallback_url.clone());
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
