use std::path::PathBuf;

use thiserror::Error;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Errors from workspace materialization and archiving.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The workspace root could not be destroyed or recreated. Fatal: the
    /// old and new generations must never coexist.
    #[error("failed to reset workspace root {path}: {source}")]
    RootReset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A requested path escapes the workspace root.
    #[error("unsafe workspace path: {0}")]
    UnsafePath(String),

    /// No files exist to serve or archive.
    #[error("workspace is empty")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}
