//! Build resolution against the remote CEF build index.
//!
//! The index is a JSON object mapping platform-architecture keys to the
//! builds published for that target. Resolution is exact-equality on the
//! (cef_version, chromium_version, channel) triple; only the "stable"
//! channel is ever accepted and there is no closest-version fallback. The
//! index is fetched fresh on every call, never cached.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::LoaderConfig;
use crate::error::ResolutionError;

/// CDN hosting both the build index and the binary archives.
pub const DEFAULT_BASE_URL: &str = "https://cef-builds.spotifycdn.com";

/// The only release channel the pipeline accepts.
const STABLE_CHANNEL: &str = "stable";

/// One published build for a platform-architecture key.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionRecord {
    pub cef_version: String,
    pub chromium_version: String,
    pub channel: String,
}

/// All builds published for one platform-architecture key.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformBuilds {
    pub versions: Vec<VersionRecord>,
}

/// The remote index, keyed by platform-architecture string ("linux64").
pub type BuildIndex = HashMap<String, PlatformBuilds>;

/// Resolved artifact identity: where to fetch it and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub full_url: String,
    pub file_name: String,
}

impl DownloadTarget {
    /// Name of the top-level directory inside the archive.
    pub fn directory_name(&self) -> &str {
        self.file_name
            .strip_suffix(".tar.bz2")
            .unwrap_or(&self.file_name)
    }
}

/// Pluggable URL-resolution strategy.
///
/// The default [`IndexUrlBuilder`] queries the public CDN index; hosts with
/// mirrored builds supply their own implementation.
pub trait DownloadUrlBuilder {
    fn build(&self, config: &LoaderConfig) -> Result<DownloadTarget, ResolutionError>;
}

/// Default strategy: fetch the CDN index and select the matching build.
#[derive(Debug, Clone)]
pub struct IndexUrlBuilder {
    base_url: String,
}

impl IndexUrlBuilder {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the builder at a different index/archive host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for IndexUrlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadUrlBuilder for IndexUrlBuilder {
    fn build(&self, config: &LoaderConfig) -> Result<DownloadTarget, ResolutionError> {
        let index = fetch_index(&self.base_url, config.download_timeout)?;
        let key = config.build_key();
        let record = select_build(&index, &key, &config.cef_version, &config.chromium_version)?;
        Ok(archive_target(&self.base_url, &record.cef_version, &key))
    }
}

/// Fetch and parse the remote build index.
fn fetch_index(base_url: &str, timeout: Duration) -> Result<BuildIndex, ResolutionError> {
    let url = format!("{}/index.json", base_url);
    let response = ureq::get(&url)
        .timeout(timeout)
        .call()
        .map_err(|e| ResolutionError::IndexFetch {
            url: url.clone(),
            source: Box::new(e),
        })?;
    response.into_json().map_err(ResolutionError::IndexParse)
}

/// Select the single build matching the requested versions on the stable
/// channel. Exact equality on all three fields.
fn select_build<'a>(
    index: &'a BuildIndex,
    key: &str,
    cef_version: &str,
    chromium_version: &str,
) -> Result<&'a VersionRecord, ResolutionError> {
    let builds = index
        .get(key)
        .ok_or_else(|| ResolutionError::UnknownPlatform(key.to_string()))?;

    builds
        .versions
        .iter()
        .find(|record| {
            record.cef_version == cef_version
                && record.chromium_version == chromium_version
                && record.channel == STABLE_CHANNEL
        })
        .ok_or_else(|| ResolutionError::NoMatchingBuild {
            key: key.to_string(),
            cef_version: cef_version.to_string(),
            chromium_version: chromium_version.to_string(),
        })
}

/// Download URL convention: `cef_binary_{version}_{key}_minimal.tar.bz2`
/// under the CDN base.
fn archive_target(base_url: &str, cef_version: &str, key: &str) -> DownloadTarget {
    let file_name = format!("cef_binary_{}_{}_minimal.tar.bz2", cef_version, key);
    DownloadTarget {
        full_url: format!("{}/{}", base_url, file_name),
        file_name,
    }
}
