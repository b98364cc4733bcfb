//! Directory watching.
//!
//! [`DirectoryWatcher`] subscribes to one directory (non-recursively) and
//! forwards create/rename events for WebP files as [`WatchedEvent`]s. The
//! notify callback only classifies and enqueues; all waiting happens
//! downstream in [`crate::processor`].

pub mod gate;
pub mod settle;

pub use gate::PathGate;
pub use settle::Stabilizer;

use crate::conversion::is_source_file;
use crate::error::{Error, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// How a watched file came to exist under its current name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedEventKind {
    Created,
    Renamed,
}

/// A file-system event that may trigger a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedEvent {
    pub path: PathBuf,
    pub kind: WatchedEventKind,
}

/// Turn a raw notify event into the events worth converting.
///
/// Creates and the destination side of renames are kept when the file name
/// has the source suffix. The old name of a rename is never forwarded.
pub fn classify(event: &Event) -> Vec<WatchedEvent> {
    let (kind, paths): (WatchedEventKind, Vec<&PathBuf>) = match event.kind {
        EventKind::Create(_) => (WatchedEventKind::Created, event.paths.iter().collect()),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::To => (WatchedEventKind::Renamed, event.paths.iter().collect()),
            // [from, to]
            RenameMode::Both => (
                WatchedEventKind::Renamed,
                event.paths.last().into_iter().collect(),
            ),
            // Backends that cannot tell old from new report each side; the
            // old side no longer exists by the time it settles
            RenameMode::Any | RenameMode::Other => {
                (WatchedEventKind::Renamed, event.paths.iter().collect())
            }
            RenameMode::From => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    paths
        .into_iter()
        .filter(|path| is_source_file(path))
        .map(|path| WatchedEvent {
            path: path.clone(),
            kind,
        })
        .collect()
}

/// Check that `dir` can be watched, returning its canonical form.
pub fn check_directory(dir: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::startup(dir, "directory does not exist"),
        _ => Error::startup(dir, format!("cannot stat directory: {e}")),
    })?;

    if !metadata.is_dir() {
        return Err(Error::startup(dir, "not a directory"));
    }

    std::fs::read_dir(dir)
        .map_err(|e| Error::startup(dir, format!("directory is not readable: {e}")))?;

    std::fs::canonicalize(dir).map_err(|e| Error::startup(dir, e.to_string()))
}

/// Live subscription to one directory. Dropping it stops the events.
pub struct DirectoryWatcher {
    directory: PathBuf,
    _watcher: RecommendedWatcher,
}

impl DirectoryWatcher {
    /// Start watching `dir`, sending qualifying events to `event_tx`.
    ///
    /// Fails fast with [`Error::Startup`] if the directory is missing or
    /// unreadable.
    pub fn start(dir: &Path, event_tx: mpsc::UnboundedSender<WatchedEvent>) -> Result<Self> {
        let directory = check_directory(dir)?;

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for watched in classify(&event) {
                        tracing::debug!(
                            path = %watched.path.display(),
                            kind = ?watched.kind,
                            "File event"
                        );
                        if event_tx.send(watched).is_err() {
                            tracing::debug!("Event receiver dropped; ignoring event");
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("File system watcher error: {}", e);
                }
            },
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching directory: {}", directory.display());

        Ok(Self {
            directory,
            _watcher: watcher,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Stop watching
    pub fn stop(self) {
        tracing::info!("File watcher stopped: {}", self.directory.display());
    }
}
