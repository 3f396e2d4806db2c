//! Server configuration from flags and environment.

use std::path::PathBuf;

use clap::Parser;

/// SiteForge: natural-language prompt in, running web preview out.
#[derive(Parser, Debug, Clone)]
#[command(name = "siteforge", version, about)]
pub struct ServerConfig {
    /// Port the HTTP API listens on.
    #[arg(long, env = "SITEFORGE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Port the generated project's dev server runs on.
    #[arg(long, env = "SITEFORGE_PREVIEW_PORT", default_value_t = 5173)]
    pub preview_port: u16,

    /// Directory that holds the materialized workspace.
    #[arg(long, env = "SITEFORGE_WORKSPACE_DIR", default_value = "generated")]
    pub workspace_dir: PathBuf,

    /// Credential for the generation backend.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Minimum milliseconds between admitted generation requests.
    #[arg(long, env = "SITEFORGE_MIN_REQUEST_INTERVAL_MS", default_value_t = 10_000)]
    pub min_request_interval_ms: u64,

    /// Fail requests with 500 when the backend stays down, instead of
    /// serving the fallback project.
    #[arg(long, env = "SITEFORGE_PROPAGATE_GENERATION_ERRORS", default_value_t = false)]
    pub propagate_generation_errors: bool,
}

impl ServerConfig {
    pub fn preview_url(&self) -> String {
        format!("http://localhost:{}", self.preview_port)
    }

    pub fn llm_configured(&self) -> bool {
        self.gemini_api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }
}
