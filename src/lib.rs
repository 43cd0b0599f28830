//! Acquisition pipeline for CEF runtime binaries.
//!
//! Given a target platform/architecture and an engine version, the
//! pipeline resolves the matching prebuilt distribution from the remote
//! build index, fetches it in parallel byte ranges (with a serial
//! fallback), decompresses the bzip2-over-tar archive, and installs the
//! runtime files into the host application's directory — with the Apple
//! framework-bundle layout handled on macOS.
//!
//! # Example
//!
//! ```no_run
//! use cef_loader::{CefLoader, LoaderConfig};
//!
//! let config = LoaderConfig::new("100.0.0", "100.0.4896.0")
//!     .app_dir("/opt/myapp")
//!     .app_name("MyBrowser");
//!
//! CefLoader::new(config).run()?;
//! # Ok::<(), cef_loader::LoaderError>(())
//! ```
//!
//! Hosts run the pipeline once before creating their window; all
//! temporary files live in a per-run workspace that is removed on every
//! exit path. Downloaded archives are not resumable across restarts and
//! are not checksum-verified.

pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod install;
pub mod loader;
pub mod platform;
pub mod report;
pub mod resolver;
pub mod workspace;

pub use config::LoaderConfig;
pub use error::{DownloadError, ExtractionError, InstallError, LoaderError, ResolutionError};
pub use loader::CefLoader;
pub use platform::{Architecture, Platform};
pub use report::{ConsoleReporter, Reporter, SilentReporter};
pub use resolver::{DownloadTarget, DownloadUrlBuilder, IndexUrlBuilder};
