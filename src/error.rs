//! Process-level error type.
//!
//! Only startup can fail the whole process; per-file conversion problems are
//! reported through [`crate::conversion::ConversionError`] instead.

use std::path::PathBuf;

/// Errors that stop the watcher from running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The watched directory is missing, not a directory, or unreadable.
    #[error("Cannot watch {}: {reason}", path.display())]
    Startup {
        /// The directory that was requested.
        path: PathBuf,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// The platform file watcher could not be created or attached.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Configuration could not be turned into a runnable setup.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Convenience constructor for [`Error::Startup`].
    pub fn startup(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Startup {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
