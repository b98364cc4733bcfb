//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which watches a scratch directory with the real
//! platform watcher and the default timings, and records every notification.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use unwebp::config::WatchConfig;
use unwebp::conversion::Converter;
use unwebp::notifications::{BroadcastNotifier, Notification};
use unwebp::processor::EventProcessor;
use unwebp::watch::DirectoryWatcher;

/// Generous upper bound for anything that depends on real file-system events.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// A watched scratch directory with a running pipeline.
pub struct TestHarness {
    _dir: TempDir,
    pub root: PathBuf,
    pub notifications: broadcast::Receiver<Notification>,
    cancel: CancellationToken,
    watcher: Option<DirectoryWatcher>,
}

impl TestHarness {
    /// Start watching a fresh directory with default timings.
    ///
    /// The watch is armed when this returns, so files written afterwards are
    /// seen.
    pub fn start() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let notifier = BroadcastNotifier::new(256);
        let notifications = notifier.subscribe();

        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
        let watcher = DirectoryWatcher::start(dir.path(), event_tx).expect("failed to watch");
        let root = watcher.directory().to_path_buf();

        let config = WatchConfig::default();
        let converter = Arc::new(Converter::webp_to_png(Arc::new(notifier)));
        let processor = Arc::new(EventProcessor::from_config(&config, converter));

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(event_rx, cancel.clone(), config.eviction_interval()));

        Self {
            _dir: dir,
            root,
            notifications,
            cancel,
            watcher: Some(watcher),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write a valid WebP image under `name` and return the pixels written.
    pub fn write_webp(&self, name: &str) -> DynamicImage {
        let img = sample_image();
        std::fs::write(self.path(name), webp_bytes(&img)).expect("failed to write webp");
        img
    }

    /// Names of all files in the watched directory with the given extension.
    pub fn files_with_extension(&self, ext: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .expect("failed to list dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| {
                p.extension()
                    .map(|e| e.eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
            })
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        names.sort();
        names
    }

    /// Wait for the next notification, failing the test on timeout.
    pub async fn next_notification(&mut self) -> Notification {
        tokio::time::timeout(EVENT_TIMEOUT, self.notifications.recv())
            .await
            .expect("timed out waiting for notification")
            .expect("notification channel closed")
    }

    /// Drain notifications that arrive within `quiet`.
    pub async fn drain_notifications(&mut self, quiet: Duration) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(Ok(n)) = tokio::time::timeout(quiet, self.notifications.recv()).await {
            seen.push(n);
        }
        seen
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn sample_image() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 9, |x, y| {
        Rgba([(x * 15) as u8, (y * 25) as u8, 128, 255])
    }))
}

pub fn webp_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::WebP)
        .expect("failed to encode webp");
    buf.into_inner()
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

/// True once `path` exists and decodes as an image.
pub fn is_decodable(path: &Path) -> bool {
    path.exists() && image::open(path).is_ok()
}
