//! Wires the watcher, processor and notifiers together for one directory.

use crate::config::Config;
use crate::conversion::Converter;
use crate::error::{Error, Result};
use crate::notifications::{NotificationManager, Notifier};
use crate::processor::EventProcessor;
use crate::watch::DirectoryWatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Resolve the watched directory from an optional override and the config.
pub fn resolve_directory(config: &Config, override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    config
        .watch
        .resolve_directory()
        .ok_or_else(|| Error::Config("could not determine the downloads directory".into()))
}

/// Watch `directory` until `cancel` fires, reporting to the configured
/// notification targets.
pub async fn run(config: &Config, directory: &Path, cancel: CancellationToken) -> Result<()> {
    let notifier: Arc<dyn Notifier> = Arc::new(NotificationManager::new(&config.notifications));
    run_with_notifier(config, directory, notifier, cancel).await
}

/// Like [`run`], with an explicit notification sink.
///
/// Startup problems (missing or unreadable directory) are returned before any
/// event is processed. Per-file failures never end the loop.
pub async fn run_with_notifier(
    config: &Config,
    directory: &Path,
    notifier: Arc<dyn Notifier>,
    cancel: CancellationToken,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let watcher = DirectoryWatcher::start(directory, event_tx)?;

    let converter = Arc::new(Converter::webp_to_png(notifier));
    let processor = Arc::new(EventProcessor::from_config(&config.watch, converter));

    tracing::info!(
        directory = %watcher.directory().display(),
        settle_ms = config.watch.settle_delay_ms,
        debounce_secs = config.watch.debounce_secs,
        "Converting new WebP files to PNG"
    );

    processor
        .run(event_rx, cancel, config.watch.eviction_interval())
        .await;

    watcher.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{BroadcastNotifier, Notification};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn override_wins_over_config() {
        let mut config = Config::default();
        config.watch.directory = Some(PathBuf::from("/from/config"));

        let dir = resolve_directory(&config, Some(Path::new("/from/cli"))).unwrap();
        assert_eq!(dir, PathBuf::from("/from/cli"));

        let dir = resolve_directory(&config, None).unwrap();
        assert_eq!(dir, PathBuf::from("/from/config"));
    }

    #[tokio::test]
    async fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = run(&Config::default(), &missing, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Startup { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn broadcast_target_alongside_configured_ones() {
        let dir = tempfile::tempdir().unwrap();
        let broadcast = BroadcastNotifier::default();
        let mut rx = broadcast.subscribe();

        let config = Config::default();
        let mut manager = NotificationManager::new(&config.notifications);
        manager.add_target(Arc::new(broadcast));

        let cancel = CancellationToken::new();
        let root = dir.path().to_path_buf();
        let handle = tokio::spawn({
            let cancel = cancel.clone();
            async move { run_with_notifier(&config, &root, Arc::new(manager), cancel).await }
        });

        // Let the watch arm before the file appears
        tokio::time::sleep(Duration::from_millis(200)).await;
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([1, 2, 3])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::WebP).unwrap();
        std::fs::write(dir.path().join("shared.webp"), buf.into_inner()).unwrap();

        let timeout = Duration::from_secs(10);
        let started = tokio::time::timeout(timeout, rx.recv()).await.unwrap().unwrap();
        let completed = tokio::time::timeout(timeout, rx.recv()).await.unwrap().unwrap();
        assert_eq!(
            started,
            Notification::Started {
                file_name: "shared.webp".into()
            }
        );
        assert_eq!(
            completed,
            Notification::Completed {
                file_name: "shared.webp".into()
            }
        );
        assert!(dir.path().join("shared.png").exists());

        cancel.cancel();
        tokio::time::timeout(timeout, handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
