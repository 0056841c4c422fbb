//! Assembly of the de-duplicated URL set from arguments, URL files and stdin.

use std::collections::HashSet;
use std::fs;
use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Args;

/// URLs gathered for one run.
#[derive(Debug, Default)]
pub(crate) struct CollectedInput {
    /// De-duplicated URLs in first-seen order.
    pub urls: Vec<String>,
    /// True when no URL source was given and stdin is an interactive terminal.
    pub no_input: bool,
}

/// Collects URLs from `--urls`, `--urls-files` and, when neither is given,
/// from piped stdin.
pub(crate) fn process_input(args: &Args) -> Result<CollectedInput> {
    let mut sources = Vec::new();
    sources.push(args.urls.join("\n"));

    for path in &args.urls_files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read URLs file {}", path.display()))?;
        sources.push(text);
    }

    if args.urls.is_empty() && args.urls_files.is_empty() {
        if io::stdin().is_terminal() {
            return Ok(CollectedInput {
                urls: Vec::new(),
                no_input: true,
            });
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read URLs from stdin")?;
        sources.push(buffer);
    }

    let urls = merge_urls(sources.iter().map(String::as_str));
    debug!(count = urls.len(), "collected URLs");
    Ok(CollectedInput {
        urls,
        no_input: false,
    })
}

/// Splits every source into lines, trims them, drops blanks and duplicates.
pub(crate) fn merge_urls<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert((*line).to_string()))
        .map(str::to_string)
        .collect()
}
