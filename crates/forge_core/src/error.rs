use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Pipeline errors, tagged with the stage that produced them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Request arrived inside the admission window.
    #[error("too many requests, retry in {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("content acquisition failed: {0}")]
    Acquisition(#[from] forge_llm::LlmError),

    #[error("workspace materialization failed: {0}")]
    Materialization(#[from] forge_workspace::WorkspaceError),

    #[error("preview startup failed: {0}")]
    Preview(#[from] forge_preview::PreviewError),
}
