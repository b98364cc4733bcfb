use std::time::Duration;

use super::WatchedEvent;

/// Holds an event back until the producing write has presumably finished.
///
/// This is a fixed, best-effort delay with no retry: if the writer is still
/// busy afterwards the decode step fails and reports it.
#[derive(Debug, Clone, Copy)]
pub struct Stabilizer {
    delay: Duration,
}

impl Stabilizer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay for this event only, then hand it back.
    pub async fn settle(&self, event: WatchedEvent) -> WatchedEvent {
        tokio::time::sleep(self.delay).await;
        tracing::trace!("Event settled: {:?}", event);
        event
    }
}
