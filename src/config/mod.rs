mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./unwebp.toml", "~/.config/unwebp/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let watch = &config.watch;

    if watch.debounce_secs == 0 {
        anyhow::bail!("watch.debounce_secs cannot be 0");
    }

    // A second event for the same path must always land inside the window
    if watch.debounce_window() <= watch.settle_delay() {
        anyhow::bail!(
            "watch.debounce_secs ({}s) must be longer than watch.settle_delay_ms ({}ms)",
            watch.debounce_secs,
            watch.settle_delay_ms
        );
    }

    if let Some(ref dir) = watch.directory {
        if dir.as_os_str().is_empty() {
            anyhow::bail!("watch.directory is set but empty");
        }
    }

    if let Some(ref command) = config.notifications.command {
        if command.is_empty() || command[0].trim().is_empty() {
            anyhow::bail!("notifications.command must name a program");
        }
    }

    Ok(())
}
