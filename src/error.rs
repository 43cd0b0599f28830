//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a downloadable build from the remote index.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("unable to fetch build index from {url}: {source}")]
    IndexFetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("unable to parse build index: {0}")]
    IndexParse(#[source] std::io::Error),

    #[error("no builds published for platform key: {0}")]
    UnknownPlatform(String),

    #[error("no stable build matches cef {cef_version} / chromium {chromium_version} on {key}")]
    NoMatchingBuild {
        key: String,
        cef_version: String,
        chromium_version: String,
    },
}

/// Both the parallel and the serial download path failed.
#[derive(Error, Debug)]
#[error("download of {url} failed after {elapsed_ms}ms: {reason}")]
pub struct DownloadError {
    pub url: String,
    pub elapsed_ms: u128,
    pub reason: String,
}

/// Errors raised while decompressing or unpacking the archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bzip2 decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("tar read error: {0}")]
    Archive(#[source] std::io::Error),

    #[error("tar contains unsafe path: {}", .0.display())]
    UnsafePath(PathBuf),

    #[error("cannot unpack {}: {source}", .path.display())]
    Unpack {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while copying runtime files into the application directory.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("expected subtree missing from archive: {}", .0.display())]
    MissingSubtree(PathBuf),

    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot copy {} -> {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot patch {}: {source}", .path.display())]
    Patch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level pipeline failure returned to the host application.
///
/// Every variant is fatal; the loader never recovers beyond the single
/// designed parallel-to-serial download fallback.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to create temporary workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Install(#[from] InstallError),
}
