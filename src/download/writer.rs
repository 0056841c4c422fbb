//! Classification of fetch outcomes and persistence of successful payloads.
//!
//! [`ResultWriter::handle`] is called exactly once per URL by the engine's
//! coordinating loop. For one outcome it performs at most one counter update,
//! at most one warning/error event, and at most one file write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::client::FetchResponse;
use super::error::{DownloadError, FailureKind};
use super::event::{DownloadEvent, EventSink};
use super::filename::destination_filename;
use super::summary::DownloadSummary;

/// Terminal classification of one fetch outcome.
#[derive(Debug)]
pub enum Classification {
    /// The body was written to `path`.
    Downloaded {
        /// Where the body was written.
        path: PathBuf,
    },
    /// A file already existed at `path`; the body was discarded.
    Duplicate {
        /// The pre-existing destination.
        path: PathBuf,
    },
    /// The outcome is a failure of the given kind.
    Failed(DownloadError),
}

/// Turns fetch outcomes into summary updates and files on disk.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    output_dir: PathBuf,
    use_hashing: bool,
    validate_status: bool,
}

impl ResultWriter {
    /// Creates a writer targeting `output_dir`, which must already exist.
    pub fn new(output_dir: impl Into<PathBuf>, use_hashing: bool, validate_status: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            use_hashing,
            validate_status,
        }
    }

    /// Classifies one outcome, records it in `summary` and reports it to `sink`.
    pub async fn handle(
        &self,
        url: &str,
        outcome: Result<FetchResponse, DownloadError>,
        summary: &mut DownloadSummary,
        sink: &dyn EventSink,
    ) -> Classification {
        let classification = self.classify(url, outcome).await;
        record(url, &classification, summary, sink);
        classification
    }

    /// Classifies one outcome, writing the payload when it is a success.
    pub async fn classify(
        &self,
        url: &str,
        outcome: Result<FetchResponse, DownloadError>,
    ) -> Classification {
        let response = match outcome {
            Ok(response) => response,
            Err(error) => return Classification::Failed(error),
        };

        if self.validate_status && !response.is_success() {
            return Classification::Failed(DownloadError::http_status(url, response.status));
        }

        let filename = match destination_filename(url, &response.body, self.use_hashing) {
            Ok(name) => name,
            Err(error) => return Classification::Failed(error),
        };
        let path = self.output_dir.join(filename);

        match write_new_file(&path, &response.body).await {
            Ok(WriteOutcome::Written) => Classification::Downloaded { path },
            Ok(WriteOutcome::AlreadyExists) => Classification::Duplicate { path },
            Err(error) => Classification::Failed(error),
        }
    }
}

fn record(
    url: &str,
    classification: &Classification,
    summary: &mut DownloadSummary,
    sink: &dyn EventSink,
) {
    match classification {
        Classification::Downloaded { path } => {
            debug!(url = %url, path = %path.display(), "resource written");
            summary.record_downloaded();
        }
        Classification::Duplicate { path } => {
            summary.record_duplicate();
            sink.emit(DownloadEvent::Warning {
                url: url.to_string(),
                message: format!("duplicate: {} already exists; not overwritten", path.display()),
            });
        }
        Classification::Failed(error) => match error.kind() {
            FailureKind::Timeout => {
                summary.record_timeout();
                sink.emit(DownloadEvent::Warning {
                    url: url.to_string(),
                    message: error.to_string(),
                });
            }
            FailureKind::Status => {
                summary.record_status_error();
                sink.emit(DownloadEvent::Warning {
                    url: url.to_string(),
                    message: error.to_string(),
                });
            }
            FailureKind::Unexpected => {
                summary.record_unexpected_error();
                sink.emit(DownloadEvent::Error {
                    url: url.to_string(),
                    message: error.to_string(),
                });
            }
        },
    }
}

enum WriteOutcome {
    Written,
    AlreadyExists,
}

/// Writes `body` to `path` with exclusive create.
///
/// Exclusive create is the collision check: of two writers racing for the same
/// path exactly one succeeds. A failed write removes the partial file.
async fn write_new_file(path: &Path, body: &[u8]) -> Result<WriteOutcome, DownloadError> {
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::AlreadyExists),
        Err(e) => return Err(DownloadError::io(path, e)),
    };

    let written = async {
        file.write_all(body).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        remove_partial_file(path).await;
        return Err(DownloadError::io(path, e));
    }

    Ok(WriteOutcome::Written)
}

async fn remove_partial_file(path: &Path) {
    debug!(path = %path.display(), "cleaning up partial file after error");
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial file"),
    }
}
