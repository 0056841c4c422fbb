//! Error types for the download module.
//!
//! Every variant here is a per-URL failure: the engine converts each one into
//! exactly one summary counter increment and one event, and keeps going.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or persisting a single resource.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request did not complete within the configured total timeout.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a status outside the success range.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing the payload.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL is malformed or does not yield a usable filename.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// Why the URL could not be used.
        reason: &'static str,
    },

    /// Any other failure reported by a fetch implementation.
    #[error("unexpected error downloading {url}: {message}")]
    Unexpected {
        /// The URL being fetched.
        url: String,
        /// Description of the failure.
        message: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason,
        }
    }

    /// Creates a catch-all error for fetch implementations that are not HTTP based.
    pub fn unexpected(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unexpected {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns the kind of outcome this error is counted as.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::HttpStatus { .. } => FailureKind::Status,
            Self::Network { .. }
            | Self::Io { .. }
            | Self::InvalidUrl { .. }
            | Self::Unexpected { .. } => FailureKind::Unexpected,
        }
    }
}

/// The summary bucket a failed outcome lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Counted in `num_timeout`.
    Timeout,
    /// Counted in `num_status_errors`.
    Status,
    /// Counted in `num_unexpected_error`.
    Unexpected,
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path the source error does not carry.
