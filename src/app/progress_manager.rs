//! Progress bar and warning/error rendering for download runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};
use url_downloader_core::{DownloadEvent, EventSink};

/// [`EventSink`] that drives an indicatif progress bar.
///
/// Warnings and errors are logged through `tracing` with the bar suspended,
/// so they print above it instead of tearing it.
pub(crate) struct ProgressSink {
    bar: ProgressBar,
    show_warnings: bool,
}

impl ProgressSink {
    /// Creates a sink for `total` URLs. A hidden bar still forwards events.
    pub(crate) fn new(total: usize, show_bar: bool, show_warnings: bool) -> Self {
        let bar = if show_bar {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner} [{elapsed_precise}] {wide_bar} {pos}/{len} downloaded",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, show_warnings }
    }

    /// Removes the bar from the terminal.
    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl EventSink for ProgressSink {
    fn emit(&self, event: DownloadEvent) {
        match event {
            DownloadEvent::Progress { completed, total } => {
                self.bar.set_length(total as u64);
                self.bar.set_position(completed as u64);
            }
            DownloadEvent::Warning { url, message } => {
                if self.show_warnings {
                    self.bar.suspend(|| warn!(url = %url, "{message}"));
                }
            }
            DownloadEvent::Error { url, message } => {
                self.bar.suspend(|| error!(url = %url, "{message}"));
            }
        }
    }
}
