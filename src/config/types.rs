use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Directory to watch (default: the user's downloads directory)
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Delay between seeing an event and reading the file
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Minimum time between two accepted conversions of the same path
    #[serde(default = "default_debounce")]
    pub debounce_secs: u64,

    /// How often expired debounce entries are dropped (0 = never)
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,
}

fn default_settle_delay() -> u64 {
    500
}
fn default_debounce() -> u64 {
    10
}
fn default_eviction_interval() -> u64 {
    60
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            directory: None,
            settle_delay_ms: default_settle_delay(),
            debounce_secs: default_debounce(),
            eviction_interval_secs: default_eviction_interval(),
        }
    }
}

impl WatchConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    pub fn eviction_interval(&self) -> Option<Duration> {
        match self.eviction_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Resolve the directory to watch.
    ///
    /// A configured directory has `~` expanded; otherwise the platform
    /// downloads directory is used, falling back to `$HOME/Downloads`.
    pub fn resolve_directory(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.directory {
            let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
            return Some(PathBuf::from(expanded));
        }

        dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Render notifications as log lines
    #[serde(default = "default_log")]
    pub log: bool,

    /// Program and arguments to run for each notification.
    /// `{title}`, `{message}` and `{file}` are substituted.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

fn default_log() -> bool {
    true
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            log: default_log(),
            command: None,
        }
    }
}
