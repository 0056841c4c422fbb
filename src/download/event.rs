//! Progress and diagnostic events emitted by a download job.
//!
//! The engine never logs through a global: each job is handed an
//! [`EventSink`], so independent jobs (and tests) observe only their own events.

use tracing::{error, info, warn};

/// An event produced while a job runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// Emitted once after every classified outcome.
    Progress {
        /// Outcomes classified so far.
        completed: usize,
        /// Number of URLs in the job.
        total: usize,
    },
    /// A non-fatal condition worth surfacing (timeout, bad status, duplicate).
    Warning {
        /// The URL the warning is about.
        url: String,
        /// Human-readable description.
        message: String,
    },
    /// An unexpected failure for one URL.
    Error {
        /// The URL that failed.
        url: String,
        /// Human-readable description, including the cause.
        message: String,
    },
}

/// Receiver of [`DownloadEvent`]s.
///
/// Called from the engine's coordinating loop, one event at a time.
pub trait EventSink: Send + Sync {
    /// Handles one event.
    fn emit(&self, event: DownloadEvent);
}

/// Sink that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: DownloadEvent) {
        match event {
            DownloadEvent::Progress { completed, total } => {
                info!(completed, total, "download progress");
            }
            DownloadEvent::Warning { url, message } => warn!(url = %url, "{message}"),
            DownloadEvent::Error { url, message } => error!(url = %url, "{message}"),
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: DownloadEvent) {}
}
