//! Temporary filesystem workspace for one acquisition run.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The set of temporary paths owned by one acquisition run: per-range part
/// files, the merged compressed archive, the decompressed tar stream, and
/// the extraction directory. Everything lives under one scratch root that
/// is removed when the workspace is closed or dropped, whichever comes
/// first — partial failure and unwinding both end with the root gone.
///
/// At most one workspace is live per loader invocation; nothing in here is
/// shared across runs.
#[derive(Debug)]
pub struct TempWorkspace {
    root: TempDir,
    archive_file: PathBuf,
    tar_file: PathBuf,
    parts_dir: PathBuf,
    extract_dir: PathBuf,
}

impl TempWorkspace {
    /// Create a fresh workspace under `scratch` (created if absent).
    pub fn create_in(scratch: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(scratch)?;
        let root = tempfile::Builder::new()
            .prefix("cef-loader-")
            .tempdir_in(scratch)?;

        let parts_dir = root.path().join("parts");
        let extract_dir = root.path().join("extracted");
        std::fs::create_dir(&parts_dir)?;
        std::fs::create_dir(&extract_dir)?;

        Ok(Self {
            archive_file: root.path().join("cef.tar.bz2"),
            tar_file: root.path().join("cef.tar"),
            parts_dir,
            extract_dir,
            root,
        })
    }

    /// Destination of the merged (or serially downloaded) archive.
    pub fn archive_file(&self) -> &Path {
        &self.archive_file
    }

    /// Destination of the decompressed tar stream.
    pub fn tar_file(&self) -> &Path {
        &self.tar_file
    }

    /// Directory the tar entries are unpacked into.
    pub fn extract_dir(&self) -> &Path {
        &self.extract_dir
    }

    /// Part-file slot for range worker `index`. Each worker writes only its
    /// own slot; the merge reads the slots back in index order.
    pub fn part_file(&self, index: usize) -> PathBuf {
        self.parts_dir.join(format!("part-{}", index))
    }

    /// Remove the workspace, reporting any filesystem error. Absent paths
    /// are not an error; dropping the workspace removes it silently.
    pub fn close(self) -> io::Result<()> {
        self.root.close()
    }
}
