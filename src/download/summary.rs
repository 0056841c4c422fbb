//! Per-job outcome counters.

use std::fmt;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Serialize, Serializer};

/// Summary describing the status of one download job.
///
/// A summary is owned by the engine's coordinating loop while the job runs
/// and handed back to the caller, read-only, once the job ends. Duplicates are
/// a sub-classification of downloads: a duplicate increments both
/// `num_downloaded` and `num_duplicates`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadSummary {
    num_downloaded: usize,
    num_duplicates: usize,
    num_timeout: usize,
    num_status_errors: usize,
    num_unexpected_error: usize,
    #[serde(serialize_with = "serialize_unix_secs")]
    start_time: SystemTime,
    #[serde(serialize_with = "serialize_opt_unix_secs")]
    end_time: Option<SystemTime>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    elapsed: Duration,
    interrupted: bool,
    #[serde(skip)]
    started_at: Instant,
}

impl Default for DownloadSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadSummary {
    /// Creates a zeroed summary stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_downloaded: 0,
            num_duplicates: 0,
            num_timeout: 0,
            num_status_errors: 0,
            num_unexpected_error: 0,
            start_time: SystemTime::now(),
            end_time: None,
            elapsed: Duration::ZERO,
            interrupted: false,
            started_at: Instant::now(),
        }
    }

    /// Number of resources fetched and written, duplicates included.
    #[must_use]
    pub fn num_downloaded(&self) -> usize {
        self.num_downloaded
    }

    /// Number of resources whose destination already existed.
    #[must_use]
    pub fn num_duplicates(&self) -> usize {
        self.num_duplicates
    }

    /// Number of fetches that exceeded the timeout.
    #[must_use]
    pub fn num_timeout(&self) -> usize {
        self.num_timeout
    }

    /// Number of responses with a non-success status.
    #[must_use]
    pub fn num_status_errors(&self) -> usize {
        self.num_status_errors
    }

    /// Number of network, I/O and other unexpected failures.
    #[must_use]
    pub fn num_unexpected_error(&self) -> usize {
        self.num_unexpected_error
    }

    /// Number of URLs that have produced an outcome.
    #[must_use]
    pub fn num_completed(&self) -> usize {
        self.num_downloaded + self.num_timeout + self.num_status_errors + self.num_unexpected_error
    }

    /// Number of URLs that did not end up on disk.
    #[must_use]
    pub fn num_failed(&self) -> usize {
        self.num_timeout + self.num_status_errors + self.num_unexpected_error
    }

    /// Wall-clock time the job started.
    #[must_use]
    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }

    /// Wall-clock time the job ended, once it has.
    #[must_use]
    pub fn end_time(&self) -> Option<SystemTime> {
        self.end_time
    }

    /// Time between job start and job end (or now, while still running).
    #[must_use]
    pub fn elapsed_time(&self) -> Duration {
        if self.end_time.is_some() {
            self.elapsed
        } else {
            self.started_at.elapsed()
        }
    }

    /// Returns true if the job was cut short by an interrupt.
    #[must_use]
    pub fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    pub(crate) fn record_downloaded(&mut self) {
        self.num_downloaded += 1;
    }

    pub(crate) fn record_duplicate(&mut self) {
        self.num_downloaded += 1;
        self.num_duplicates += 1;
    }

    pub(crate) fn record_timeout(&mut self) {
        self.num_timeout += 1;
    }

    pub(crate) fn record_status_error(&mut self) {
        self.num_status_errors += 1;
    }

    pub(crate) fn record_unexpected_error(&mut self) {
        self.num_unexpected_error += 1;
    }

    pub(crate) fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Stamps the end time. Later calls are no-ops.
    pub(crate) fn finish(&mut self) {
        if self.end_time.is_none() {
            self.elapsed = self.started_at.elapsed();
            self.end_time = Some(SystemTime::now());
        }
    }
}

impl fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Num downloaded: {}", self.num_downloaded)?;
        writeln!(f, "Num duplicates: {}", self.num_duplicates)?;
        writeln!(f, "Num timeouts: {}", self.num_timeout)?;
        writeln!(f, "Num status errors: {}", self.num_status_errors)?;
        write!(f, "Num unexpected errors: {}", self.num_unexpected_error)
    }
}

fn unix_secs(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn serialize_unix_secs<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(unix_secs(*time))
}

#[allow(clippy::ref_option)]
fn serialize_opt_unix_secs<S: Serializer>(
    time: &Option<SystemTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => serializer.serialize_some(&unix_secs(*time)),
        None => serializer.serialize_none(),
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
