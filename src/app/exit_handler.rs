//! Exit code logic for the downloader process.
//!
//! Single responsibility: map the job summary to the process exit outcome.

use std::process::ExitCode;

use url_downloader_core::DownloadSummary;

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Nothing failed.
    Success,
    /// Some URLs downloaded, some failed.
    Partial,
    /// Every URL failed, or the run could not start.
    Failure,
    /// The run was cut short by Ctrl+C.
    Interrupted,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::Partial => ExitCode::from(2),
            ProcessExit::Interrupted => ExitCode::from(130),
        }
    }
}

/// Determines the process exit outcome from a finished job.
pub(crate) fn determine_exit_outcome(summary: &DownloadSummary) -> ProcessExit {
    if summary.was_interrupted() {
        return ProcessExit::Interrupted;
    }
    outcome_from_counts(summary.num_downloaded(), summary.num_failed())
}

fn outcome_from_counts(downloaded: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if downloaded > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
