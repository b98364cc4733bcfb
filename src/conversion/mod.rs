//! WebP→PNG conversion.
//!
//! - [`codec`]: the decode/encode boundary and file-name rules
//! - [`converter`]: the per-file state machine that replaces a source file
//!   with its converted sibling

pub mod codec;
mod converter;

pub use codec::{is_source_file, target_path, ImageCodec, WebpToPng, SOURCE_EXTENSION, TARGET_EXTENSION};
pub use converter::{
    ConversionError, ConversionOutcome, ConversionResult, ConversionStage, Converter, FailureKind,
};
