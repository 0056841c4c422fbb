//! URL Downloader Core Library
//!
//! Concurrently downloads resources identified by URLs into a local directory
//! and reports a summary of the outcomes (downloads, duplicates, timeouts,
//! HTTP-status failures and unexpected errors).
//!
//! # Architecture
//!
//! - [`download`] - Bounded-concurrency engine, result classification and
//!   file writing, the fetch capability and its HTTP implementation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;

// Re-export commonly used types
pub use download::{
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DownloadEngine, DownloadError, DownloadEvent,
    DownloadOptions, DownloadSummary, EngineError, EventSink, FetchResponse, Fetcher, HttpClient,
    TracingSink, download_urls,
};
