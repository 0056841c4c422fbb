//! Test helper that records the level of every `tracing` event.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Clone, Default)]
pub(crate) struct CapturedLevels(Arc<Mutex<Vec<Level>>>);

impl CapturedLevels {
    /// Installs a thread-local subscriber feeding this capture.
    ///
    /// Only events from the current thread are seen, so callers use the
    /// current-thread runtime.
    pub(crate) fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// Number of events at `level` or more severe.
    pub(crate) fn at_least(&self, level: Level) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|captured| **captured <= level)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for CapturedLevels {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}
