//! Single-file conversion.
//!
//! [`Converter::convert`] walks one file through
//! `Idle → Decoding → Encoding → Replacing → {Done | Failed}` and always
//! returns a [`ConversionResult`]; no error escapes to the caller.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageError;

use super::codec::{target_path, ImageCodec, WebpToPng};
use crate::notifications::{Notification, Notifier};

/// Where a conversion is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Idle,
    Decoding,
    Encoding,
    Replacing,
    Done,
    Failed,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionStage::Idle => "idle",
            ConversionStage::Decoding => "decoding",
            ConversionStage::Encoding => "encoding",
            ConversionStage::Replacing => "replacing",
            ConversionStage::Done => "done",
            ConversionStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Coarse failure category, one per error class the user can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Source unreadable or not a valid image. Source untouched.
    Decode,
    /// Target could not be produced. Source untouched.
    Encode,
    /// Target written but the source could not be removed.
    Cleanup,
}

/// Why a single conversion failed.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a valid WebP image: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("could not encode PNG: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("converted to {} but could not remove the original: {source}", target.display())]
    Cleanup {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConversionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConversionError::Read { .. } | ConversionError::Decode { .. } => FailureKind::Decode,
            ConversionError::Encode { .. } | ConversionError::Write { .. } => FailureKind::Encode,
            ConversionError::Cleanup { .. } => FailureKind::Cleanup,
        }
    }

    /// The stage the conversion was in when it failed.
    pub fn stage(&self) -> ConversionStage {
        match self {
            ConversionError::Read { .. } | ConversionError::Decode { .. } => {
                ConversionStage::Decoding
            }
            ConversionError::Encode { .. } => ConversionStage::Encoding,
            ConversionError::Write { .. } | ConversionError::Cleanup { .. } => {
                ConversionStage::Replacing
            }
        }
    }
}

#[derive(Debug)]
pub enum ConversionOutcome {
    Success,
    Failure(ConversionError),
}

/// Outcome of one converter run.
#[derive(Debug)]
pub struct ConversionResult {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Success)
    }

    pub fn error(&self) -> Option<&ConversionError> {
        match &self.outcome {
            ConversionOutcome::Success => None,
            ConversionOutcome::Failure(e) => Some(e),
        }
    }

    /// Terminal state reached.
    pub fn stage(&self) -> ConversionStage {
        match self.outcome {
            ConversionOutcome::Success => ConversionStage::Done,
            ConversionOutcome::Failure(_) => ConversionStage::Failed,
        }
    }
}

/// Converts one source file into its target sibling and removes the source.
///
/// Blocking; callers on an async runtime should use `spawn_blocking`.
pub struct Converter {
    codec: Arc<dyn ImageCodec>,
    notifier: Arc<dyn Notifier>,
}

impl Converter {
    pub fn new(codec: Arc<dyn ImageCodec>, notifier: Arc<dyn Notifier>) -> Self {
        Self { codec, notifier }
    }

    /// WebP→PNG converter reporting to `notifier`.
    pub fn webp_to_png(notifier: Arc<dyn Notifier>) -> Self {
        Self::new(Arc::new(WebpToPng), notifier)
    }

    pub fn convert(&self, source: &Path) -> ConversionResult {
        let file_name = display_name(source);
        let target = target_path(source);

        self.notifier.notify(&Notification::Started {
            file_name: file_name.clone(),
        });

        let outcome = match self.run(source, &target) {
            Ok(()) => {
                tracing::info!(
                    source = %source.display(),
                    target = %target.display(),
                    "Conversion complete"
                );
                self.notifier
                    .notify(&Notification::Completed { file_name });
                ConversionOutcome::Success
            }
            Err(e) => {
                tracing::warn!(
                    source = %source.display(),
                    stage = %e.stage(),
                    error = %e,
                    "Conversion failed"
                );
                self.notifier.notify(&Notification::Failed {
                    file_name,
                    message: e.to_string(),
                });
                ConversionOutcome::Failure(e)
            }
        };

        ConversionResult {
            source_path: source.to_path_buf(),
            target_path: target,
            outcome,
        }
    }

    fn run(&self, source: &Path, target: &Path) -> Result<(), ConversionError> {
        let mut stage = ConversionStage::Idle;
        advance(source, &mut stage, ConversionStage::Decoding);

        let data = std::fs::read(source).map_err(|e| ConversionError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        let image = self
            .codec
            .decode(&data)
            .map_err(|e| ConversionError::Decode {
                path: source.to_path_buf(),
                source: e,
            })?;

        advance(source, &mut stage, ConversionStage::Encoding);

        // Encode fully in memory so a codec error never leaves a partial target
        let encoded = self
            .codec
            .encode(&image)
            .map_err(|e| ConversionError::Encode {
                path: target.to_path_buf(),
                source: e,
            })?;

        advance(source, &mut stage, ConversionStage::Replacing);

        std::fs::write(target, &encoded).map_err(|e| ConversionError::Write {
            path: target.to_path_buf(),
            source: e,
        })?;

        std::fs::remove_file(source).map_err(|e| ConversionError::Cleanup {
            source_path: source.to_path_buf(),
            target: target.to_path_buf(),
            source: e,
        })?;

        advance(source, &mut stage, ConversionStage::Done);
        Ok(())
    }
}

fn advance(source: &Path, stage: &mut ConversionStage, next: ConversionStage) {
    tracing::trace!(file = %source.display(), from = %stage, to = %next, "Conversion stage");
    *stage = next;
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
