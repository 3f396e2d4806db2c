//! Destroy-and-replace workspace materialization.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use forge_artifact::{is_safe_relative_path, FileArtifact};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::default_project;
use crate::error::{WorkspaceError, WorkspaceResult};

/// Fingerprint of one materialized workspace generation.
///
/// Every successful [`Materializer::materialize`] call mints a fresh id, so
/// holders of stale references (cache entries) can detect that the files
/// they pointed at are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationId(Uuid);

impl GenerationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Writes artifact sets to a single workspace directory.
///
/// The workspace holds exactly one generation at a time. Materialization
/// destroys the previous generation wholesale before writing the next one;
/// the two are never merged.
pub struct Materializer {
    root: PathBuf,
    current: RwLock<Option<GenerationId>>,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Id of the generation currently on disk, if any was materialized by
    /// this process.
    pub fn current_generation(&self) -> Option<GenerationId> {
        *self.current.read()
    }

    /// Replace the workspace with `artifacts`.
    ///
    /// Root reset failures are fatal. Individual artifacts with unsafe
    /// paths or failing writes are skipped with a warning so one bad file
    /// cannot sink an otherwise usable project. An empty artifact set
    /// materializes the built-in default project instead.
    pub fn materialize(&self, artifacts: &[FileArtifact]) -> WorkspaceResult<GenerationId> {
        self.reset_root()?;

        let default_set;
        let artifacts = if artifacts.is_empty() {
            info!("no artifacts extracted, synthesizing default project");
            default_set = default_project::default_artifacts();
            &default_set
        } else {
            artifacts
        };

        let mut written = 0usize;
        for artifact in artifacts {
            if !artifact.has_safe_path() {
                warn!(path = %artifact.relative_path, "skipping artifact with unsafe path");
                continue;
            }
            if let Err(err) = self.write_artifact(artifact) {
                warn!(path = %artifact.relative_path, error = %err, "skipping artifact, write failed");
                continue;
            }
            written += 1;
        }

        let generation = GenerationId::new();
        *self.current.write() = Some(generation);
        info!(files = written, %generation, "workspace materialized");
        Ok(generation)
    }

    /// Read a file from the current workspace, re-validating the path.
    pub fn read_file(&self, relative: &str) -> WorkspaceResult<Vec<u8>> {
        if !is_safe_relative_path(relative) {
            return Err(WorkspaceError::UnsafePath(relative.to_string()));
        }
        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(WorkspaceError::Empty);
        }
        Ok(fs::read(path)?)
    }

    fn reset_root(&self) -> WorkspaceResult<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|source| WorkspaceError::RootReset {
                path: self.root.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&self.root).map_err(|source| WorkspaceError::RootReset {
            path: self.root.clone(),
            source,
        })
    }

    fn write_artifact(&self, artifact: &FileArtifact) -> std::io::Result<()> {
        let path = self.root.join(&artifact.relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &artifact.content)
    }
}
