//! Download engine for bounded-concurrency batch downloads.
//!
//! This module provides the [`DownloadEngine`], which fans a set of URLs out
//! over a fixed number of in-flight fetches and routes every outcome, exactly
//! once, to a [`ResultWriter`].
//!
//! # Concurrency Model
//!
//! - Each fetch runs in its own Tokio task inside a `JoinSet`
//! - A semaphore permit is acquired before a fetch task is spawned
//! - Permits are released when the fetch completes (RAII), before classification
//! - One coordinating loop owns the [`DownloadSummary`] and classifies
//!   outcomes in completion order, so counter updates never race
//! - The job resolves only after every outcome, including its file write, has
//!   been classified
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use tokio_util::sync::CancellationToken;
//! use url_downloader_core::download::{DownloadEngine, DownloadOptions, HttpClient, TracingSink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(DownloadOptions::default())?;
//! let urls = vec!["https://example.com/file.pdf".to_string()];
//! let summary = engine
//!     .run(
//!         urls,
//!         Path::new("./downloads"),
//!         Arc::new(HttpClient::new()),
//!         &TracingSink,
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::client::{FetchResponse, Fetcher, HttpClient};
use super::constants::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, MIN_CONCURRENCY};
use super::error::DownloadError;
use super::event::{DownloadEvent, EventSink, TracingSink};
use super::summary::DownloadSummary;
use super::writer::ResultWriter;

/// Error type for job-fatal conditions.
///
/// Per-URL failures never surface here; they are counted in the summary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error("invalid concurrency value {value}: must be at least {MIN_CONCURRENCY}")]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// A zero timeout was provided.
    #[error("invalid timeout: must be greater than zero")]
    InvalidTimeout,

    /// The output directory is missing or not a directory.
    #[error("output directory {path} is not usable: {reason}")]
    OutputDirectory {
        /// The configured output directory.
        path: PathBuf,
        /// Why it cannot be used.
        reason: String,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Settings for one download job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Name files after the SHA-256 digest of their content instead of the URL.
    pub use_hashing: bool,
    /// Maximum number of fetches in flight at once.
    pub num_concurrent: usize,
    /// Total time allowed for one fetch.
    pub timeout: Duration,
    /// Count non-2xx responses as status errors instead of writing them.
    pub validate_status: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            use_hashing: false,
            num_concurrent: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            validate_status: true,
        }
    }
}

/// Bounded-concurrency download engine.
///
/// The engine holds only configuration. Every call to [`run`](Self::run)
/// creates its own admission gate and summary, so independent jobs can share
/// an engine.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    options: DownloadOptions,
}

impl DownloadEngine {
    /// Creates a new engine after validating `options`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if `num_concurrent` is
    /// zero, or [`EngineError::InvalidTimeout`] for a zero timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use url_downloader_core::download::{DownloadEngine, DownloadOptions};
    ///
    /// let engine = DownloadEngine::new(DownloadOptions::default()).unwrap();
    /// assert_eq!(engine.options().num_concurrent, 5);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(options: DownloadOptions) -> Result<Self, EngineError> {
        if options.num_concurrent < MIN_CONCURRENCY {
            return Err(EngineError::InvalidConcurrency {
                value: options.num_concurrent,
            });
        }
        if options.timeout.is_zero() {
            return Err(EngineError::InvalidTimeout);
        }

        debug!(
            concurrency = options.num_concurrent,
            timeout_ms = options.timeout.as_millis(),
            use_hashing = options.use_hashing,
            "creating download engine"
        );

        Ok(Self { options })
    }

    /// Returns the validated options.
    #[must_use]
    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Downloads every URL in `urls` into `output_dir`.
    ///
    /// `urls` is expected to be de-duplicated by the caller. Outcomes are
    /// classified in completion order; a progress event is sent to `sink`
    /// after each one.
    ///
    /// Cancelling `cancel` stops admitting new fetches, aborts the ones in
    /// flight, and returns the partial summary with
    /// [`DownloadSummary::was_interrupted`] set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutputDirectory`] if `output_dir` is not an
    /// existing directory, and [`EngineError::SemaphoreClosed`] if permit
    /// acquisition fails. Individual download failures do NOT cause this
    /// method to error.
    #[instrument(skip(self, urls, fetcher, sink, cancel), fields(output_dir = %output_dir.display()))]
    pub async fn run<I>(
        &self,
        urls: I,
        output_dir: &Path,
        fetcher: Arc<dyn Fetcher>,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<DownloadSummary, EngineError>
    where
        I: IntoIterator<Item = String>,
    {
        check_output_dir(output_dir).await?;

        let mut summary = DownloadSummary::new();
        let mut pending = urls.into_iter().collect::<Vec<_>>().into_iter();
        let total = pending.len();

        debug!(
            total,
            concurrency = self.options.num_concurrent,
            "starting download job"
        );

        let writer = ResultWriter::new(
            output_dir,
            self.options.use_hashing,
            self.options.validate_status,
        );
        let semaphore = Arc::new(Semaphore::new(self.options.num_concurrent));
        let mut in_flight: JoinSet<Result<FetchResponse, DownloadError>> = JoinSet::new();
        let mut urls_by_task: HashMap<Id, String> = HashMap::new();

        loop {
            let has_pending = !pending.as_slice().is_empty();
            if !has_pending && in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!(
                        completed = summary.num_completed(),
                        in_flight = in_flight.len(),
                        total,
                        "download job interrupted"
                    );
                    summary.mark_interrupted();
                    in_flight.shutdown().await;
                    break;
                }

                Some(joined) = in_flight.join_next_with_id(), if !in_flight.is_empty() => {
                    let (url, outcome) = match joined {
                        Ok((id, outcome)) => (urls_by_task.remove(&id), outcome),
                        Err(join_error) => {
                            let url = urls_by_task.remove(&join_error.id());
                            debug!(error = %join_error, "fetch task failed");
                            let message = format!("fetch task failed: {join_error}");
                            let outcome = Err(DownloadError::unexpected(
                                url.clone().unwrap_or_default(),
                                message,
                            ));
                            (url, outcome)
                        }
                    };
                    let url = url.unwrap_or_default();

                    // Not raced against `cancel`: a half-classified outcome
                    // would leave a file on disk with no counter for it.
                    writer.handle(&url, outcome, &mut summary, sink).await;
                    sink.emit(DownloadEvent::Progress {
                        completed: summary.num_completed(),
                        total,
                    });
                }

                permit = Arc::clone(&semaphore).acquire_owned(), if has_pending => {
                    let permit = permit.map_err(|_| EngineError::SemaphoreClosed)?;
                    let Some(url) = pending.next() else {
                        continue;
                    };
                    debug!(url = %url, "admitting fetch");

                    let fetcher = Arc::clone(&fetcher);
                    let timeout = self.options.timeout;
                    let task_url = url.clone();
                    let handle = in_flight.spawn(async move {
                        // Permit is dropped when the fetch finishes (RAII)
                        let _permit = permit;
                        fetch_with_timeout(fetcher.as_ref(), &task_url, timeout).await
                    });
                    urls_by_task.insert(handle.id(), url);
                }
            }
        }

        summary.finish();
        debug!(
            downloaded = summary.num_downloaded(),
            duplicates = summary.num_duplicates(),
            timeouts = summary.num_timeout(),
            status_errors = summary.num_status_errors(),
            unexpected_errors = summary.num_unexpected_error(),
            interrupted = summary.was_interrupted(),
            elapsed_ms = summary.elapsed_time().as_millis(),
            "download job complete"
        );

        Ok(summary)
    }
}

/// Runs one fetch, converting an overrun of `timeout` into a timeout outcome.
async fn fetch_with_timeout(
    fetcher: &dyn Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<FetchResponse, DownloadError> {
    match tokio::time::timeout(timeout, fetcher.fetch(url, timeout)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(DownloadError::timeout(url)),
    }
}

async fn check_output_dir(output_dir: &Path) -> Result<(), EngineError> {
    match tokio::fs::metadata(output_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(EngineError::OutputDirectory {
            path: output_dir.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Err(e) => Err(EngineError::OutputDirectory {
            path: output_dir.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Downloads `urls` into `output_dir` over HTTP, logging through `tracing`.
///
/// Convenience entry point for callers that need neither a custom fetcher,
/// a custom event sink, nor cancellation.
///
/// # Errors
///
/// Returns [`EngineError`] for invalid configuration or an unusable output
/// directory.
pub async fn download_urls<I>(
    urls: I,
    output_dir: &Path,
    use_hashing: bool,
    num_concurrent: usize,
    timeout: Duration,
) -> Result<DownloadSummary, EngineError>
where
    I: IntoIterator<Item = String>,
{
    let engine = DownloadEngine::new(DownloadOptions {
        use_hashing,
        num_concurrent,
        timeout,
        ..DownloadOptions::default()
    })?;
    engine
        .run(
            urls,
            output_dir,
            Arc::new(HttpClient::new()),
            &TracingSink,
            &CancellationToken::new(),
        )
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::download::event::NullSink;

    /// Fetcher that serves a fixed body per URL after a delay and records the
    /// in-flight high-water mark and per-URL call counts.
    #[derive(Default)]
    struct InstrumentedFetcher {
        delay: Duration,
        in_flight: AtomicUsize,
        high_water: AtomicUsize,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl InstrumentedFetcher {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        fn high_water(&self) -> usize {
            self.high_water.load(Ordering::SeqCst)
        }

        fn calls(&self) -> HashMap<String, usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for InstrumentedFetcher {
        async fn fetch(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> Result<FetchResponse, DownloadError> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(FetchResponse::new(url, 200, url.as_bytes().to_vec()))
        }
    }

    /// Fetcher that never completes.
    struct HangingFetcher;

    #[async_trait]
    impl Fetcher for HangingFetcher {
        async fn fetch(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> Result<FetchResponse, DownloadError> {
            std::future::pending().await
        }
    }

    /// Fetcher that panics for every URL.
    struct PanickingFetcher;

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> Result<FetchResponse, DownloadError> {
            panic!("injected fetch panic");
        }
    }

    /// Fetcher that answers immediately unless the URL is under `/hang/`,
    /// in which case it never completes.
    struct SelectiveFetcher;

    #[async_trait]
    impl Fetcher for SelectiveFetcher {
        async fn fetch(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> Result<FetchResponse, DownloadError> {
            if url.contains("/hang/") {
                std::future::pending::<()>().await;
            }
            Ok(FetchResponse::new(url, 200, url.as_bytes().to_vec()))
        }
    }

    #[derive(Default)]
    struct EventRecorder(Mutex<Vec<DownloadEvent>>);

    impl EventSink for EventRecorder {
        fn emit(&self, event: DownloadEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl EventRecorder {
        fn errors(&self) -> usize {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|event| matches!(event, DownloadEvent::Error { .. }))
                .count()
        }
    }

    #[derive(Default)]
    struct ProgressRecorder(Mutex<Vec<(usize, usize)>>);

    impl EventSink for ProgressRecorder {
        fn emit(&self, event: DownloadEvent) {
            if let DownloadEvent::Progress { completed, total } = event {
                self.0.lock().unwrap().push((completed, total));
            }
        }
    }

    fn urls(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("https://example.com/files/file-{i}.bin"))
            .collect()
    }

    fn engine(num_concurrent: usize, timeout: Duration) -> DownloadEngine {
        DownloadEngine::new(DownloadOptions {
            num_concurrent,
            timeout,
            ..DownloadOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn test_engine_new_valid_concurrency() {
        for value in [1, 5, 100] {
            let engine = engine(value, DEFAULT_TIMEOUT);
            assert_eq!(engine.options().num_concurrent, value);
        }
    }

    #[test]
    fn test_engine_new_invalid_concurrency_zero() {
        let result = DownloadEngine::new(DownloadOptions {
            num_concurrent: 0,
            ..DownloadOptions::default()
        });
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_engine_new_accepts_concurrency_above_cli_limit() {
        for value in [101, 150, 1000] {
            let engine = engine(value, DEFAULT_TIMEOUT);
            assert_eq!(engine.options().num_concurrent, value);
        }
    }

    #[test]
    fn test_engine_new_rejects_zero_timeout() {
        let result = DownloadEngine::new(DownloadOptions {
            timeout: Duration::ZERO,
            ..DownloadOptions::default()
        });
        assert!(matches!(result, Err(EngineError::InvalidTimeout)));
    }

    #[test]
    fn test_default_options() {
        let options = DownloadOptions::default();
        assert_eq!(options.num_concurrent, 5);
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert!(!options.use_hashing);
        assert!(options.validate_status);
    }

    #[test]
    fn test_engine_error_display() {
        let msg = EngineError::InvalidConcurrency { value: 0 }.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains("at least 1"));
    }

    #[tokio::test]
    async fn test_run_empty_url_set_returns_zero_summary() {
        let dir = TempDir::new().unwrap();
        let sink = ProgressRecorder::default();

        let summary = engine(5, DEFAULT_TIMEOUT)
            .run(
                Vec::new(),
                dir.path(),
                Arc::new(InstrumentedFetcher::default()),
                &sink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(summary.num_completed(), 0);
        assert_eq!(summary.num_duplicates(), 0);
        assert!(summary.end_time().is_some());
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_never_exceeds_concurrency_limit() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(InstrumentedFetcher::with_delay(Duration::from_millis(20)));

        let summary = engine(3, DEFAULT_TIMEOUT)
            .run(
                urls(12),
                dir.path(),
                Arc::clone(&fetcher) as Arc<dyn Fetcher>,
                &NullSink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(summary.num_downloaded(), 12);
        assert!(fetcher.high_water() <= 3, "high water {}", fetcher.high_water());
        assert!(fetcher.high_water() >= 2, "fetches should overlap");
    }

    #[tokio::test]
    async fn test_run_effective_concurrency_capped_by_url_count() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(InstrumentedFetcher::with_delay(Duration::from_millis(20)));

        engine(50, DEFAULT_TIMEOUT)
            .run(
                urls(2),
                dir.path(),
                Arc::clone(&fetcher) as Arc<dyn Fetcher>,
                &NullSink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(fetcher.high_water() <= 2);
    }

    #[tokio::test]
    async fn test_run_fetches_each_url_exactly_once() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(InstrumentedFetcher::with_delay(Duration::from_millis(1)));
        let input = urls(25);

        let summary = engine(4, DEFAULT_TIMEOUT)
            .run(
                input.clone(),
                dir.path(),
                Arc::clone(&fetcher) as Arc<dyn Fetcher>,
                &NullSink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let calls = fetcher.calls();
        assert_eq!(calls.len(), input.len());
        assert!(calls.values().all(|&count| count == 1));
        assert_eq!(summary.num_completed(), input.len());
        for url in &input {
            let name = url.rsplit('/').next().unwrap();
            assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), url.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_run_emits_one_progress_event_per_outcome() {
        let dir = TempDir::new().unwrap();
        let sink = ProgressRecorder::default();

        engine(2, DEFAULT_TIMEOUT)
            .run(
                urls(5),
                dir.path(),
                Arc::new(InstrumentedFetcher::with_delay(Duration::from_millis(1))),
                &sink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let progress = sink.0.lock().unwrap().clone();
        assert_eq!(progress, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
    }

    #[tokio::test]
    async fn test_run_classifies_overrun_as_timeout() {
        let dir = TempDir::new().unwrap();

        let summary = engine(1, Duration::from_millis(1))
            .run(
                vec!["https://example.com/slow.bin".to_string()],
                dir.path(),
                Arc::new(InstrumentedFetcher::with_delay(Duration::from_secs(5))),
                &NullSink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(summary.num_timeout(), 1);
        assert_eq!(summary.num_downloaded(), 0);
        assert!(!dir.path().join("slow.bin").exists());
    }

    #[tokio::test]
    async fn test_run_cancel_unwinds_without_hanging() {
        let dir = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            engine(2, DEFAULT_TIMEOUT).run(
                urls(10),
                dir.path(),
                Arc::new(HangingFetcher),
                &NullSink,
                &cancel,
            ),
        )
        .await
        .expect("run should return after cancellation")
        .unwrap();

        assert!(summary.was_interrupted());
        assert_eq!(summary.num_completed(), 0);
    }

    #[tokio::test]
    async fn test_run_already_cancelled_admits_nothing() {
        let dir = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let fetcher = Arc::new(InstrumentedFetcher::default());

        let summary = engine(2, DEFAULT_TIMEOUT)
            .run(
                urls(3),
                dir.path(),
                Arc::clone(&fetcher) as Arc<dyn Fetcher>,
                &NullSink,
                &cancel,
            )
            .await
            .unwrap();

        assert!(summary.was_interrupted());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_counts_panicking_fetch_as_unexpected_error() {
        let dir = TempDir::new().unwrap();

        let summary = engine(2, DEFAULT_TIMEOUT)
            .run(
                urls(3),
                dir.path(),
                Arc::new(PanickingFetcher),
                &NullSink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(summary.num_unexpected_error(), 3);
        assert_eq!(summary.num_completed(), 3);
    }

    #[tokio::test]
    async fn test_run_panicking_fetch_reports_one_error_per_url() {
        let dir = TempDir::new().unwrap();
        let sink = EventRecorder::default();
        let logs = crate::download::log_capture::CapturedLevels::default();
        let _guard = logs.install();

        engine(2, DEFAULT_TIMEOUT)
            .run(
                urls(3),
                dir.path(),
                Arc::new(PanickingFetcher),
                &sink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(sink.errors(), 3);
        assert_eq!(logs.at_least(tracing::Level::WARN), 0);
    }

    #[tokio::test]
    async fn test_run_leaves_info_logging_to_the_sink() {
        let dir = TempDir::new().unwrap();
        let logs = crate::download::log_capture::CapturedLevels::default();
        let _guard = logs.install();

        let summary = engine(2, DEFAULT_TIMEOUT)
            .run(
                urls(4),
                dir.path(),
                Arc::new(InstrumentedFetcher::default()),
                &NullSink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(summary.num_downloaded(), 4);
        assert_eq!(logs.at_least(tracing::Level::INFO), 0);
    }

    #[tokio::test]
    async fn test_run_interrupt_keeps_outcomes_classified_before_it() {
        let dir = TempDir::new().unwrap();
        let fast = [
            "https://example.com/fast/a.bin",
            "https://example.com/fast/b.bin",
            "https://example.com/fast/c.bin",
        ];
        let hanging = [
            "https://example.com/hang/d.bin",
            "https://example.com/hang/e.bin",
        ];
        let input: Vec<String> = fast
            .iter()
            .chain(hanging.iter())
            .map(ToString::to_string)
            .collect();
        let sink = ProgressRecorder::default();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            engine(5, DEFAULT_TIMEOUT).run(
                input,
                dir.path(),
                Arc::new(SelectiveFetcher),
                &sink,
                &cancel,
            ),
        )
        .await
        .expect("run should return after cancellation")
        .unwrap();

        assert!(summary.was_interrupted());
        assert_eq!(summary.num_completed(), fast.len());
        assert_eq!(summary.num_downloaded(), fast.len());
        assert_eq!(sink.0.lock().unwrap().len(), fast.len());
        for url in fast {
            let name = url.rsplit('/').next().unwrap();
            assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), url.as_bytes());
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), fast.len());
    }

    #[tokio::test]
    async fn test_run_rejects_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let result = engine(2, DEFAULT_TIMEOUT)
            .run(
                urls(1),
                &missing,
                Arc::new(InstrumentedFetcher::default()),
                &NullSink,
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(EngineError::OutputDirectory { .. })));
    }
}
