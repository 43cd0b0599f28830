//! Two-stage archive extraction: bzip2 stream to tar file, tar to tree.
//!
//! Uses native Rust libraries - no external tools required. Both stages
//! write into the run's workspace; a failure in either stage is fatal and
//! leaves cleanup to the workspace owner.

use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path};

use crate::error::ExtractionError;
use crate::report::Reporter;
use crate::workspace::TempWorkspace;

/// Decompress the downloaded archive and unpack its contents into the
/// workspace extraction directory.
pub fn extract(workspace: &TempWorkspace, reporter: &dyn Reporter) -> Result<(), ExtractionError> {
    decompress(workspace.archive_file(), workspace.tar_file(), reporter)?;
    unpack(workspace.tar_file(), workspace.extract_dir(), reporter)
}

/// Stage one: bzip2 stream into an intermediate tar file.
fn decompress(archive: &Path, tar_file: &Path, reporter: &dyn Reporter) -> Result<(), ExtractionError> {
    reporter.detail("decompressing bzip2 archive");

    let file = File::open(archive).map_err(|e| ExtractionError::Open {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut decoder = bzip2::read::BzDecoder::new(BufReader::new(file));

    let mut out = File::create(tar_file).map_err(|e| ExtractionError::Open {
        path: tar_file.to_path_buf(),
        source: e,
    })?;
    std::io::copy(&mut decoder, &mut out).map_err(ExtractionError::Decompress)?;
    Ok(())
}

/// Stage two: unpack the tar file entry-by-entry into `dest`, reporting
/// each entry to the observer.
fn unpack(tar_file: &Path, dest: &Path, reporter: &dyn Reporter) -> Result<(), ExtractionError> {
    reporter.detail("unpacking tar archive");

    std::fs::create_dir_all(dest).map_err(|e| ExtractionError::Unpack {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let file = File::open(tar_file).map_err(|e| ExtractionError::Open {
        path: tar_file.to_path_buf(),
        source: e,
    })?;
    let mut archive = tar::Archive::new(BufReader::new(file));

    for entry in archive.entries().map_err(ExtractionError::Archive)? {
        let mut entry = entry.map_err(ExtractionError::Archive)?;
        let path = entry
            .path()
            .map_err(ExtractionError::Archive)?
            .into_owned();

        // Reject paths that could escape the destination.
        if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
            return Err(ExtractionError::UnsafePath(path));
        }

        // Some archives contain a "." entry; treat it as a no-op.
        if path.as_os_str().is_empty() || path == Path::new(".") {
            continue;
        }

        let full_path = dest.join(&path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractionError::Unpack {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        entry.unpack(&full_path).map_err(|e| ExtractionError::Unpack {
            path: path.clone(),
            source: e,
        })?;
        reporter.detail(&format!("extracted {}", path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SilentReporter;
    use std::io::Write;

    /// Build a tar.bz2 archive at `dest` from (path, contents) pairs.
    fn write_archive(dest: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(dest).unwrap();
        let encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            // Write the entry name directly into the header so the archive can
            // carry unsafe paths (e.g. `..`) that the high-level path setters
            // reject. `append` writes the header verbatim without re-validating.
            let name = &mut header.as_gnu_mut().unwrap().name;
            name.iter_mut().for_each(|b| *b = 0);
            name[..path.len()].copy_from_slice(path.as_bytes());
            header.set_cksum();
            builder.append(&header, *content).unwrap();
        }

        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap();
    }

    fn workspace_with_archive(files: &[(&str, &[u8])]) -> (tempfile::TempDir, TempWorkspace) {
        let scratch = tempfile::tempdir().unwrap();
        let ws = TempWorkspace::create_in(scratch.path()).unwrap();
        write_archive(ws.archive_file(), files);
        (scratch, ws)
    }

    #[test]
    fn test_extract_two_stage_archive() {
        let (_scratch, ws) = workspace_with_archive(&[
            ("pkg/Release/libcef.so", b"binary"),
            ("pkg/Resources/icudtl.dat", b"tables"),
        ]);

        extract(&ws, &SilentReporter).unwrap();

        // The intermediate tar file is a real workspace artifact.
        assert!(ws.tar_file().exists());
        assert_eq!(
            std::fs::read(ws.extract_dir().join("pkg/Release/libcef.so")).unwrap(),
            b"binary"
        );
        assert_eq!(
            std::fs::read(ws.extract_dir().join("pkg/Resources/icudtl.dat")).unwrap(),
            b"tables"
        );
    }

    #[test]
    fn test_extract_reports_each_entry() {
        use std::sync::Mutex;

        struct Recorder(Mutex<Vec<String>>);
        impl Reporter for Recorder {
            fn info(&self, _m: &str) {}
            fn detail(&self, m: &str) {
                self.0.lock().unwrap().push(m.to_string());
            }
            fn warn(&self, _m: &str) {}
            fn error(&self, _m: &str) {}
        }

        let (_scratch, ws) = workspace_with_archive(&[("pkg/a", b"1"), ("pkg/b", b"2")]);
        let recorder = Recorder(Mutex::new(Vec::new()));

        extract(&ws, &recorder).unwrap();

        let events = recorder.0.into_inner().unwrap();
        assert!(events.iter().any(|e| e.contains("pkg/a")));
        assert!(events.iter().any(|e| e.contains("pkg/b")));
    }

    #[test]
    fn test_extract_fails_on_corrupt_outer_stream() {
        let scratch = tempfile::tempdir().unwrap();
        let ws = TempWorkspace::create_in(scratch.path()).unwrap();
        std::fs::write(ws.archive_file(), b"this is not a bzip2 stream").unwrap();

        let err = extract(&ws, &SilentReporter).unwrap_err();
        assert!(matches!(err, ExtractionError::Decompress(_)));
    }

    #[test]
    fn test_extract_fails_on_truncated_tar() {
        let scratch = tempfile::tempdir().unwrap();
        let ws = TempWorkspace::create_in(scratch.path()).unwrap();

        // Valid bzip2 stream whose payload is garbage rather than a tar.
        let file = File::create(ws.archive_file()).unwrap();
        let mut encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
        encoder.write_all(&[0x55u8; 700]).unwrap();
        encoder.finish().unwrap();

        let err = extract(&ws, &SilentReporter).unwrap_err();
        assert!(matches!(err, ExtractionError::Archive(_)));
    }

    #[test]
    fn test_extract_rejects_parent_traversal() {
        let (_scratch, ws) = workspace_with_archive(&[("../evil.txt", b"pwned")]);

        let err = extract(&ws, &SilentReporter).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsafePath(_)));
        assert!(!ws.extract_dir().join("../evil.txt").exists());
    }
}
