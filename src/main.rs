//! CLI entry point for the URL downloader.

use std::process::ExitCode;

mod app;
mod cli;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_downloader().await {
        Ok(exit) => exit.into(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(1)
        }
    }
}
