//! Pipeline orchestration: resolve, download, extract, install.

use std::time::Instant;

use crate::config::LoaderConfig;
use crate::download::Downloader;
use crate::error::LoaderError;
use crate::report::{ConsoleReporter, Reporter};
use crate::resolver::{DownloadUrlBuilder, IndexUrlBuilder};
use crate::workspace::TempWorkspace;
use crate::{extract, install};

/// One runtime acquisition run.
///
/// Constructed per invocation; holds the configuration, the URL-resolution
/// strategy, and the reporter the stages emit through. The run owns its
/// temporary workspace end to end and releases it on every exit path —
/// success, stage failure, or unwinding.
///
/// The pipeline is not reentrant: two concurrent [`run`](Self::run) calls
/// in one process are undefined, and serializing them is the caller's
/// responsibility. Hosts invoke this once, before the window initializes.
pub struct CefLoader {
    config: LoaderConfig,
    url_builder: Box<dyn DownloadUrlBuilder>,
    reporter: Box<dyn Reporter>,
}

impl CefLoader {
    /// Create a loader with the default CDN index resolution and console
    /// reporting.
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            url_builder: Box::new(IndexUrlBuilder::new()),
            reporter: Box::new(ConsoleReporter::new()),
        }
    }

    /// Replace the URL-resolution strategy.
    pub fn with_url_builder(mut self, url_builder: Box<dyn DownloadUrlBuilder>) -> Self {
        self.url_builder = url_builder;
        self
    }

    /// Replace the reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run the pipeline to completion.
    ///
    /// On success the runtime file set exists under the configured
    /// application directory. On failure the error has already been
    /// reported with elapsed-time context and the workspace is gone either
    /// way.
    pub fn run(&self) -> Result<(), LoaderError> {
        let started = Instant::now();

        let workspace =
            TempWorkspace::create_in(&self.config.scratch_dir).map_err(LoaderError::Workspace)?;
        let result = self.run_stages(&workspace);
        if let Err(err) = workspace.close() {
            self.reporter
                .warn(&format!("workspace cleanup failed: {}", err));
        }

        match &result {
            Ok(()) => self.reporter.info(&format!(
                "CEF runtime ready in {}ms",
                started.elapsed().as_millis()
            )),
            Err(err) => self.reporter.error(&format!(
                "runtime acquisition failed after {}ms: {}",
                started.elapsed().as_millis(),
                err
            )),
        }
        result
    }

    fn run_stages(&self, workspace: &TempWorkspace) -> Result<(), LoaderError> {
        let reporter = self.reporter.as_ref();

        let step = Instant::now();
        let target = self.url_builder.build(&self.config)?;
        reporter.detail(&format!(
            "resolved {} in {}ms",
            target.file_name,
            step.elapsed().as_millis()
        ));

        let step = Instant::now();
        Downloader::new(
            self.config.download_timeout,
            self.config.worker_count,
            reporter,
        )
        .fetch(&target, workspace)?;
        reporter.detail(&format!("download took {}ms", step.elapsed().as_millis()));

        let step = Instant::now();
        extract::extract(workspace, reporter)?;
        reporter.detail(&format!(
            "decompressing archive took {}ms",
            step.elapsed().as_millis()
        ));

        let step = Instant::now();
        install::install(
            workspace.extract_dir(),
            target.directory_name(),
            &self.config.app_dir,
            self.config.platform,
            reporter,
        )?;
        if self.config.platform.is_apple() {
            install::patch_app_name(&self.config.app_dir, &self.config.app_name, reporter)?;
        }
        reporter.detail(&format!(
            "copying files took {}ms",
            step.elapsed().as_millis()
        ));

        Ok(())
    }
}
