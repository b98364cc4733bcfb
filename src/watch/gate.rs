//! Per-path debounce ledger.
//!
//! Remembers when each path was last let through and suppresses new triggers
//! for the same path until the window has passed.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Thread-safe accept/suppress decision per path.
pub struct PathGate {
    entries: DashMap<PathBuf, Instant>,
    window: Duration,
}

impl PathGate {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decide whether `path` may proceed at `now`, recording the acceptance.
    ///
    /// The first call for a path always succeeds. Later calls succeed only
    /// once `window` has elapsed since the last accepted one; a rejected call
    /// leaves the stored time unchanged. The check and the update happen
    /// under the entry's shard lock, so concurrent callers for one path can
    /// never both be accepted inside a window.
    pub fn accept(&self, path: &Path, now: Instant) -> bool {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(mut entry) => {
                // A `now` before the stored time counts as no time elapsed
                if now.saturating_duration_since(*entry.get()) >= self.window {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Last accepted time for `path`, if any.
    pub fn last_accepted(&self, path: &Path) -> Option<Instant> {
        self.entries.get(path).map(|entry| *entry.value())
    }

    /// Drop entries whose window has fully elapsed.
    ///
    /// Such entries would accept the next call anyway, so removing them never
    /// changes a decision. Returns how many were removed.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, accepted| now.saturating_duration_since(*accepted) < self.window);
        before.saturating_sub(self.entries.len())
    }

    /// Get the number of tracked paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no paths are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
