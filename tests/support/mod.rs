//! Shared helpers for integration tests: an event recorder and mock endpoints.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use url_downloader_core::{DownloadEvent, EventSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Event sink that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DownloadEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DownloadEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::Warning { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::Error { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::Progress { completed, total } => Some((completed, total)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: DownloadEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Mounts a GET endpoint answering `status` with `body` after `delay`.
pub async fn mount_file(
    server: &MockServer,
    path_str: &str,
    status: u16,
    body: &[u8],
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_bytes(body.to_vec())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// URL on a local port where nothing listens.
pub fn refused_url(name: &str) -> String {
    format!("http://127.0.0.1:1/{name}")
}
