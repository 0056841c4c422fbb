//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use url_downloader_core::download::MAX_CONCURRENCY;
use url_downloader_core::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};

/// Download resources over HTTP and write them to a directory.
///
/// URLs are taken from --urls and --urls-files; when neither is given they are
/// read from standard input, one per line.
#[derive(Parser, Debug)]
#[command(name = "url-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// URLs of resources to be downloaded
    #[arg(short = 'u', long = "urls", value_name = "URL", num_args = 1..)]
    pub urls: Vec<String>,

    /// Files containing rows of URLs of resources to be downloaded
    #[arg(short = 'U', long = "urls-files", value_name = "URLS_FILE", num_args = 1..)]
    pub urls_files: Vec<PathBuf>,

    /// Name downloaded resources by the SHA-256 hash of their contents
    #[arg(short = 'x', long)]
    pub use_hashing: bool,

    /// Number of concurrent downloads (1-100)
    #[arg(short = 'n', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=MAX_CONCURRENCY as i64))]
    pub num_concurrent: u8,

    /// Total time in seconds to wait for one download before timing out
    #[arg(short = 't', long = "timeout", value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Do not print warning messages
    #[arg(short = 'w', long)]
    pub ignore_warnings: bool,

    /// Do not print warnings, errors, progress, or the result summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory where downloaded resources are saved (must exist)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".", value_parser = parse_output_dir)]
    pub output_dir: PathBuf,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the result summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_output_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("the output directory \"{value}\" does not exist"));
    }
    if !path.is_dir() {
        return Err(format!("the output directory \"{value}\" is not a directory"));
    }
    Ok(path)
}
