//! Parallel multi-range artifact download with a serial fallback.
//!
//! The archive is fetched as `worker_count` contiguous byte ranges, one OS
//! thread per range, each writing its own pre-assigned part file. Workers
//! share nothing; the merge runs only after every worker has joined and
//! reads the part slots back in range order, producing a file byte-identical
//! to a single-stream download. Any failure on the parallel path abandons
//! it entirely in favor of one serial full-stream attempt — there is no
//! per-range retry.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::DownloadError;
use crate::report::Reporter;
use crate::resolver::DownloadTarget;
use crate::workspace::TempWorkspace;

/// Inclusive byte range of one download worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes the range covers. Ranges are never empty by
    /// construction.
    pub fn len(self) -> u64 {
        self.end - self.start + 1
    }

    /// HTTP `Range` header value for this range.
    pub fn header_value(self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

/// Partition `[0, total_len - 1]` into contiguous, non-overlapping ranges,
/// the last absorbing any remainder. The worker count is clamped so every
/// range covers at least one byte; a zero-length file yields no ranges.
pub fn split_ranges(total_len: u64, workers: usize) -> Vec<ByteRange> {
    if total_len == 0 {
        return Vec::new();
    }
    let workers = (workers as u64).clamp(1, total_len);
    let chunk = total_len / workers;

    (0..workers)
        .map(|i| ByteRange {
            start: i * chunk,
            end: if i == workers - 1 {
                total_len - 1
            } else {
                (i + 1) * chunk - 1
            },
        })
        .collect()
}

/// Fetches one resolved artifact into the workspace archive slot.
pub struct Downloader<'a> {
    timeout: Duration,
    workers: usize,
    reporter: &'a dyn Reporter,
}

impl<'a> Downloader<'a> {
    pub fn new(timeout: Duration, workers: usize, reporter: &'a dyn Reporter) -> Self {
        Self {
            timeout,
            workers: workers.max(1),
            reporter,
        }
    }

    /// Download the artifact into `workspace.archive_file()`.
    ///
    /// Tries the parallel multi-range path first; any failure there falls
    /// back to exactly one serial full-stream attempt. If both fail, the
    /// error carries the URL and the total elapsed time.
    pub fn fetch(
        &self,
        target: &DownloadTarget,
        workspace: &TempWorkspace,
    ) -> Result<(), DownloadError> {
        let started = Instant::now();

        if let Err(reason) = self.fetch_parallel(target, workspace) {
            self.reporter.warn(&format!(
                "parallel download failed ({}), retrying as a single stream",
                reason
            ));
            self.fetch_serial(&target.full_url, workspace.archive_file())
                .map_err(|reason| DownloadError {
                    url: target.full_url.clone(),
                    elapsed_ms: started.elapsed().as_millis(),
                    reason,
                })?;
        }

        Ok(())
    }

    fn fetch_parallel(
        &self,
        target: &DownloadTarget,
        workspace: &TempWorkspace,
    ) -> Result<(), String> {
        let total = self.content_length(&target.full_url)?;
        let ranges = split_ranges(total, self.workers);
        if ranges.is_empty() {
            return Err("remote reports zero content length".to_string());
        }

        self.reporter.info(&format!(
            "downloading {} ({} MB, {} ranges)",
            target.file_name,
            total / (1024 * 1024),
            ranges.len()
        ));

        // Arena by index: slot i belongs to worker i alone. The merge reads
        // the slots back in order after the join barrier below.
        let parts: Vec<PathBuf> = (0..ranges.len()).map(|i| workspace.part_file(i)).collect();
        let url = target.full_url.as_str();

        let results: Vec<Result<(), String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .iter()
                .zip(&parts)
                .map(|(range, part)| scope.spawn(move || self.fetch_range(url, *range, part)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err("range worker panicked".to_string()))
                })
                .collect()
        });
        for result in results {
            result?;
        }

        self.merge_parts(&parts, workspace.archive_file(), total)
    }

    /// Fetch a single byte range into its part-file slot.
    fn fetch_range(&self, url: &str, range: ByteRange, part: &Path) -> Result<(), String> {
        let response = ureq::get(url)
            .timeout(self.timeout)
            .set("Range", &range.header_value())
            .call()
            .map_err(|e| format!("range {} failed: {}", range.header_value(), e))?;

        // A server that ignores Range replies 200 with the whole body;
        // merging those would corrupt the archive.
        if response.status() != 206 {
            return Err(format!(
                "server ignored range request (status {})",
                response.status()
            ));
        }

        let mut reader = response.into_reader();
        let mut file =
            File::create(part).map_err(|e| format!("cannot create part file: {}", e))?;
        let written =
            io::copy(&mut reader, &mut file).map_err(|e| format!("range read error: {}", e))?;

        if written != range.len() {
            return Err(format!(
                "range {} returned {} bytes, expected {}",
                range.header_value(),
                written,
                range.len()
            ));
        }

        self.reporter
            .detail(&format!("fetched bytes {}-{}", range.start, range.end));
        Ok(())
    }

    /// Merge part files in range order into `dest`, deleting each part as
    /// it is consumed.
    fn merge_parts(&self, parts: &[PathBuf], dest: &Path, expected: u64) -> Result<(), String> {
        let mut out = File::create(dest).map_err(|e| format!("cannot create archive: {}", e))?;

        let mut total = 0u64;
        for part in parts {
            let mut reader =
                File::open(part).map_err(|e| format!("cannot open part file: {}", e))?;
            total +=
                io::copy(&mut reader, &mut out).map_err(|e| format!("merge write error: {}", e))?;
            std::fs::remove_file(part).map_err(|e| format!("cannot remove part file: {}", e))?;
        }

        if total != expected {
            return Err(format!(
                "merged {} bytes, expected {}",
                total, expected
            ));
        }
        Ok(())
    }

    /// Issue a metadata-only request for the artifact's total length.
    fn content_length(&self, url: &str) -> Result<u64, String> {
        let response = ureq::head(url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| format!("metadata request failed: {}", e))?;

        response
            .header("content-length")
            .and_then(|value| value.parse::<u64>().ok())
            .ok_or_else(|| "missing content-length header".to_string())
    }

    /// Single full-stream download into `dest`, with byte progress.
    fn fetch_serial(&self, url: &str, dest: &Path) -> Result<(), String> {
        let response = ureq::get(url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| format!("download failed: {}", e))?;

        let total = response
            .header("content-length")
            .and_then(|value| value.parse::<u64>().ok());
        self.reporter.progress_start("downloading archive", total);

        let mut reader = response.into_reader();
        let mut file = File::create(dest).map_err(|e| format!("cannot create file: {}", e))?;
        let mut buffer = [0u8; 8192];
        let mut position = 0u64;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| format!("read error: {}", e))?;
            if bytes_read == 0 {
                break;
            }
            file.write_all(&buffer[..bytes_read])
                .map_err(|e| format!("write error: {}", e))?;
            position += bytes_read as u64;
            self.reporter.progress(position);
        }

        self.reporter.progress_finish();
        self.reporter
            .detail(&format!("downloaded {} bytes", position));
        Ok(())
    }
}
