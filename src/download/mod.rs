//! Bounded-concurrency HTTP download engine.
//!
//! This module fans a set of URLs out over a fixed number of concurrent
//! requests and writes each fetched resource into an output directory.
//!
//! # Features
//!
//! - Concurrency cap enforced by a semaphore (any positive number of in-flight fetches)
//! - Per-request total timeout, classified as an ordinary outcome
//! - Files named after the URL's last path segment, or by SHA-256 of the body
//! - Collision-safe writes: an existing destination is never overwritten
//! - Per-job [`DownloadSummary`] and injected [`EventSink`] for progress
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use url_downloader_core::download::download_urls;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let urls = vec!["https://example.com/paper.pdf".to_string()];
//! let summary = download_urls(urls, Path::new("."), false, 5, Duration::from_secs(60)).await?;
//! println!("Downloaded: {}", summary.num_downloaded());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod event;
pub mod filename;
#[cfg(test)]
mod log_capture;
mod summary;
mod writer;

pub use client::{FetchResponse, Fetcher, HttpClient};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT_SECS,
    MAX_CONCURRENCY, MIN_CONCURRENCY,
};
pub use engine::{DownloadEngine, DownloadOptions, EngineError, download_urls};
pub use error::{DownloadError, FailureKind};
pub use event::{DownloadEvent, EventSink, NullSink, TracingSink};
pub use summary::DownloadSummary;
pub use writer::{Classification, ResultWriter};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
