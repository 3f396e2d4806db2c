use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

/// Errors from dependency installation and preview supervision.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The install command exited non-zero. Fatal for the request.
    #[error("dependency install failed (status {status:?}): {stderr_tail}")]
    InstallFailed {
        status: Option<i32>,
        stderr_tail: String,
    },

    /// The install command overran its hard deadline and was killed.
    #[error("dependency install timed out after {seconds}s")]
    InstallTimeout { seconds: u64 },

    /// A supervised command could not be spawned at all.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
