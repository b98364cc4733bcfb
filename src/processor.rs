//! Event pipeline: settle → gate → convert.
//!
//! Every incoming [`WatchedEvent`] is handled on its own task so a slow
//! conversion or a pending settle delay never holds up other paths.

use crate::config::WatchConfig;
use crate::conversion::{ConversionResult, Converter};
use crate::watch::{PathGate, Stabilizer, WatchedEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What happened to one event.
#[derive(Debug)]
pub enum Disposition {
    /// The path no longer named a file after settling (renamed away or
    /// deleted). Dropped before the gate.
    Vanished,
    /// The gate saw this path too recently.
    Suppressed,
    /// The converter ran; see the result for success or failure.
    Converted(ConversionResult),
    /// The conversion task panicked.
    Aborted,
}

impl Disposition {
    pub fn is_converted(&self) -> bool {
        matches!(self, Disposition::Converted(_))
    }
}

/// Shared pipeline state for all event tasks.
pub struct EventProcessor {
    gate: Arc<PathGate>,
    stabilizer: Stabilizer,
    converter: Arc<Converter>,
}

impl EventProcessor {
    pub fn new(gate: Arc<PathGate>, stabilizer: Stabilizer, converter: Arc<Converter>) -> Self {
        Self {
            gate,
            stabilizer,
            converter,
        }
    }

    pub fn from_config(config: &WatchConfig, converter: Arc<Converter>) -> Self {
        Self::new(
            Arc::new(PathGate::new(config.debounce_window())),
            Stabilizer::new(config.settle_delay()),
            converter,
        )
    }

    pub fn gate(&self) -> &Arc<PathGate> {
        &self.gate
    }

    /// Take one event through the whole pipeline.
    pub async fn handle(&self, event: WatchedEvent) -> Disposition {
        let event = self.stabilizer.settle(event).await;
        let path = event.path;

        if !path.is_file() {
            tracing::debug!(path = %path.display(), "File gone after settling; skipping");
            return Disposition::Vanished;
        }

        let now = tokio::time::Instant::now().into_std();
        if !self.gate.accept(&path, now) {
            tracing::debug!(path = %path.display(), "Suppressed duplicate event");
            return Disposition::Suppressed;
        }

        tracing::info!(path = %path.display(), kind = ?event.kind, "Converting");

        let converter = self.converter.clone();
        let source = path.clone();
        match tokio::task::spawn_blocking(move || converter.convert(&source)).await {
            Ok(result) => Disposition::Converted(result),
            Err(e) => {
                tracing::error!(path = %path.display(), "Conversion task failed: {}", e);
                Disposition::Aborted
            }
        }
    }

    /// Dispatch events until cancelled or the sender side closes.
    pub async fn run(
        self: Arc<Self>,
        mut event_rx: mpsc::UnboundedReceiver<WatchedEvent>,
        cancel: CancellationToken,
        eviction_interval: Option<std::time::Duration>,
    ) {
        tracing::info!("Event processor started");

        let mut eviction = eviction_interval.map(tokio::time::interval);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!("Event processor shutting down");
                    break;
                }

                event = event_rx.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Event channel closed");
                        break;
                    };
                    let this = self.clone();
                    tokio::spawn(async move {
                        this.handle(event).await;
                    });
                }

                _ = async {
                    match eviction.as_mut() {
                        Some(interval) => {
                            interval.tick().await;
                        }
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    let removed = self
                        .gate
                        .evict_expired(tokio::time::Instant::now().into_std());
                    if removed > 0 {
                        tracing::debug!("Evicted {} expired debounce entries", removed);
                    }
                }
            }
        }
    }
}
