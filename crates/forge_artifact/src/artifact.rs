use serde::{Deserialize, Serialize};

/// A single project file recovered from a generated response.
///
/// The path is relative to the workspace root and has not yet been
/// safety-checked; the materializer validates it before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArtifact {
    pub relative_path: String,
    pub content: String,
}

impl FileArtifact {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Whether this artifact may be written under a workspace root.
    pub fn has_safe_path(&self) -> bool {
        is_safe_relative_path(&self.relative_path)
    }
}

/// Checks that a path stays inside the directory it is resolved against.
///
/// Rejects empty paths, absolute paths (both `/` and `\` rooted), Windows
/// drive prefixes, and any `.` or `..` segment.
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    // C:\ or C:/ style prefixes
    if path.as_bytes().get(1) == Some(&b':') {
        return false;
    }
    path.split(['/', '\\'])
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
