//! Zip packaging of the current workspace.

use std::fs::File;
use std::io::{self, Cursor, Seek, Write};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{WorkspaceError, WorkspaceResult};

/// Stream every file under `workspace_root` into a zip archive.
///
/// Entry names are workspace-relative with forward slashes. An absent or
/// fileless workspace is [`WorkspaceError::Empty`].
pub fn write_zip<W: Write + Seek>(workspace_root: &Path, writer: W) -> WorkspaceResult<()> {
    let files = collect_files(workspace_root);
    if files.is_empty() {
        return Err(WorkspaceError::Empty);
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for relative in &files {
        zip.start_file(relative.clone(), options)?;
        let mut file = File::open(workspace_root.join(relative))?;
        io::copy(&mut file, &mut zip)?;
    }

    zip.finish()?;
    debug!(files = files.len(), "workspace archived");
    Ok(())
}

/// Archive the workspace into an in-memory buffer.
pub fn zip_to_bytes(workspace_root: &Path) -> WorkspaceResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    write_zip(workspace_root, &mut buffer)?;
    Ok(buffer.into_inner())
}

fn collect_files(root: &Path) -> Vec<String> {
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect()
}
