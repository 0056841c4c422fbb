use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url_downloader_core::{DownloadEngine, DownloadOptions, EventSink, HttpClient};
use url_downloader_core::download::NullSink;

use crate::app::exit_handler::{self, ProcessExit};
use crate::app::{input_processor, progress_manager, terminal};
use crate::cli::Args;
use crate::output;

pub(crate) async fn run_downloader() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    terminal::init_tracing(terminal::resolve_default_log_level(&args));
    debug!(?args, "CLI arguments parsed");

    let input = input_processor::process_input(&args)?;
    if input.no_input {
        info!("{}", output::NO_INPUT_GUIDANCE);
        info!("{}", output::INPUT_PIPE_EXAMPLE);
        return Ok(ProcessExit::Success);
    }
    let num_urls = input.urls.len();
    info!(urls = num_urls, output_dir = %args.output_dir.display(), "starting downloader");

    let engine = DownloadEngine::new(DownloadOptions {
        use_hashing: args.use_hashing,
        num_concurrent: usize::from(args.num_concurrent),
        timeout: Duration::from_secs(args.timeout_secs),
        ..DownloadOptions::default()
    })?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let show_bar = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );
    let progress = progress_manager::ProgressSink::new(num_urls, show_bar, !args.ignore_warnings);
    let sink: &dyn EventSink = if args.quiet { &NullSink } else { &progress };

    let summary = engine
        .run(
            input.urls,
            &args.output_dir,
            Arc::new(HttpClient::new()),
            sink,
            &cancel,
        )
        .await?;
    progress.finish();

    if args.json {
        println!("{}", output::render_json_summary(&summary, num_urls)?);
    } else if !args.quiet {
        println!("{}", output::render_completion_summary(&summary, num_urls));
    }

    if summary.was_interrupted() {
        warn!(
            completed = summary.num_completed(),
            total = num_urls,
            "Interrupted before all URLs were downloaded"
        );
    }

    Ok(exit_handler::determine_exit_outcome(&summary))
}
