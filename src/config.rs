//! Loader configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::platform::{self, Architecture, Platform};

/// Default download timeout, in minutes.
const DEFAULT_TIMEOUT_MINUTES: u64 = 10;

/// Configuration for one runtime acquisition run.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Platform the runtime files are installed for.
    pub platform: Platform,
    /// Architecture of the runtime build.
    pub arch: Architecture,
    /// CEF version that must match the build record exactly.
    pub cef_version: String,
    /// Chromium version paired with the CEF version.
    pub chromium_version: String,
    /// Application name patched into the macOS bundle metadata.
    pub app_name: String,
    /// Directory the runtime files are installed into.
    pub app_dir: PathBuf,
    /// Directory the temporary workspace is created under.
    pub scratch_dir: PathBuf,
    /// Per-request download timeout.
    pub download_timeout: Duration,
    /// Number of parallel range downloads.
    pub worker_count: usize,
}

impl LoaderConfig {
    /// Create a configuration for the host platform with default paths:
    /// the runtime installs next to the running executable and the
    /// workspace lives under the system temp directory.
    pub fn new(cef_version: impl Into<String>, chromium_version: impl Into<String>) -> Self {
        let exe = std::env::current_exe().ok();
        let app_dir = exe
            .as_deref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let app_name = exe
            .as_deref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "cef-app".to_string());

        Self {
            platform: Platform::current(),
            arch: Architecture::current(),
            cef_version: cef_version.into(),
            chromium_version: chromium_version.into(),
            app_name,
            app_dir,
            scratch_dir: std::env::temp_dir(),
            download_timeout: Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60),
            worker_count: num_cpus::get().max(1),
        }
    }

    /// Set the target platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the target architecture.
    pub fn arch(mut self, arch: Architecture) -> Self {
        self.arch = arch;
        self
    }

    /// Set the installation directory.
    pub fn app_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.app_dir = dir.into();
        self
    }

    /// Set the application name used for the macOS bundle patch.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the directory the temporary workspace is created under.
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Set the per-request download timeout, in minutes.
    pub fn download_timeout_minutes(mut self, minutes: u64) -> Self {
        self.download_timeout = Duration::from_secs(minutes * 60);
        self
    }

    /// Set the number of parallel range downloads.
    pub fn worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers.max(1);
        self
    }

    /// The platform-architecture key this configuration resolves against.
    pub fn build_key(&self) -> String {
        platform::build_key(self.platform, self.arch)
    }
}
