//! CLI output formatting for the completion summary.

use std::time::Duration;

use anyhow::Result;
use url_downloader_core::DownloadSummary;

/// Message when no input was provided at all.
pub const NO_INPUT_GUIDANCE: &str =
    "No input provided. Pass URLs with --urls/--urls-files or pipe them via stdin.";

/// Example for piping input.
pub const INPUT_PIPE_EXAMPLE: &str =
    "Example: echo 'https://example.com/file.pdf' | url-downloader -o downloads";

/// Renders the human-readable completion summary with values aligned.
pub fn render_completion_summary(summary: &DownloadSummary, num_urls: usize) -> String {
    let text = format!(
        "Elapsed time: {}\nNum URLs: {num_urls}\n{summary}",
        format_elapsed(summary.elapsed_time())
    );
    align_on_delimiter(&text, ':')
}

/// Renders the summary as pretty-printed JSON.
pub fn render_json_summary(summary: &DownloadSummary, num_urls: usize) -> Result<String> {
    let mut value = serde_json::to_value(summary)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("num_urls".to_string(), num_urls.into());
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Formats a duration as `H:MM:SS.ffffff`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}

/// Pads each line's label so the text after the first `delimiter` lines up.
///
/// Lines without the delimiter are left untouched.
pub fn align_on_delimiter(text: &str, delimiter: char) -> String {
    let width = text
        .lines()
        .filter_map(|line| line.find(delimiter))
        .max()
        .unwrap_or(0);

    text.lines()
        .map(|line| match line.split_once(delimiter) {
            Some((label, value)) => {
                format!("{label}{delimiter}{:pad$} {}", "", value.trim_start(), pad = width - label.len())
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
