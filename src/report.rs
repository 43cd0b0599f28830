//! Progress and log reporting port.
//!
//! The pipeline never talks to a global logger; every component receives a
//! [`Reporter`] and emits through it. [`ConsoleReporter`] renders colored
//! terminal output with a progress bar; [`SilentReporter`] swallows
//! everything and is what embedders and tests usually want.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Mutex;
use std::time::Duration;

/// Sink for pipeline progress events.
///
/// Implementations must be shareable across the download worker threads.
pub trait Reporter: Send + Sync {
    /// Stage-level message.
    fn info(&self, message: &str);

    /// Per-operation message (one file extracted, one range fetched).
    fn detail(&self, message: &str);

    /// Recoverable oddity (parallel path abandoned, cleanup hiccup).
    fn warn(&self, message: &str);

    /// Fatal pipeline failure, reported just before it propagates.
    fn error(&self, message: &str);

    /// Begin a long-running operation; `total` is in bytes when known.
    fn progress_start(&self, _message: &str, _total: Option<u64>) {}

    /// Update the current operation's byte position.
    fn progress(&self, _position: u64) {}

    /// End the current operation.
    fn progress_finish(&self) {}
}

/// Terminal reporter: colored prefixes and a live progress bar.
#[derive(Default)]
pub struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{} {}", "==>".blue().bold(), message.bold());
    }

    fn detail(&self, message: &str) {
        println!("     {}", message.dimmed());
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }

    fn progress_start(&self, message: &str, total: Option<u64>) {
        let pb = match total {
            Some(total) => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "     {spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})",
                        )
                        .unwrap()
                        .progress_chars("━╸━"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("     {spinner:.cyan} {msg}")
                        .unwrap()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                pb.set_message(message.to_string());
                pb
            }
        };
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn progress(&self, position: u64) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_position(position);
        }
    }

    fn progress_finish(&self) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }
}

/// Reporter that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}
    fn detail(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
