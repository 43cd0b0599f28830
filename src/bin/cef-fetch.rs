//! Standalone runtime prefetcher.
//!
//! Downloads and installs the CEF runtime into a directory without going
//! through a host application, so deployments can warm the runtime ahead
//! of first launch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cef_loader::{Architecture, CefLoader, LoaderConfig, Platform};

#[derive(Parser)]
#[command(
    name = "cef-fetch",
    version,
    about = "Download and install the CEF runtime for an application directory"
)]
struct Args {
    /// CEF version to install (e.g. 100.0.0)
    #[arg(long)]
    cef_version: String,

    /// Chromium version paired with the CEF version (e.g. 100.0.4896.0)
    #[arg(long)]
    chromium_version: String,

    /// Target platform (windows, linux, macosx); defaults to the host
    #[arg(long)]
    platform: Option<Platform>,

    /// Target architecture (x64, x86, arm64); defaults to the host
    #[arg(long)]
    arch: Option<Architecture>,

    /// Directory to install the runtime into; defaults to the directory
    /// of this executable
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Application name patched into the macOS bundle metadata
    #[arg(long)]
    app_name: Option<String>,

    /// Download timeout in minutes
    #[arg(long, default_value_t = 10)]
    timeout_minutes: u64,

    /// Number of parallel download ranges; defaults to the CPU count
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = LoaderConfig::new(args.cef_version, args.chromium_version)
        .download_timeout_minutes(args.timeout_minutes);
    if let Some(platform) = args.platform {
        config = config.platform(platform);
    }
    if let Some(arch) = args.arch {
        config = config.arch(arch);
    }
    if let Some(dir) = args.dir {
        config = config.app_dir(dir);
    }
    if let Some(app_name) = args.app_name {
        config = config.app_name(app_name);
    }
    if let Some(workers) = args.workers {
        config = config.worker_count(workers);
    }

    CefLoader::new(config).run()?;
    Ok(())
}
