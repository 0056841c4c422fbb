//! Constants for the download module (timeouts, concurrency bounds).

use std::time::Duration;

/// Default total per-request timeout (60 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default total per-request timeout as a [`Duration`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Default HTTP connect timeout used by [`super::HttpClient`] (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent requests.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Largest concurrency value accepted on the command line.
pub const MAX_CONCURRENCY: usize = 100;
