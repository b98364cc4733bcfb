//! Image codec boundary.
//!
//! The converter only sees `decode(bytes) -> image` and
//! `encode(image) -> bytes`; format parsing lives in the `image` crate.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageResult};

/// Extension of files that are picked up and converted.
pub const SOURCE_EXTENSION: &str = "webp";

/// Extension of files that are produced.
pub const TARGET_EXTENSION: &str = "png";

/// Decode/encode capability for one fixed source→target format pair.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, data: &[u8]) -> ImageResult<DynamicImage>;
    fn encode(&self, image: &DynamicImage) -> ImageResult<Vec<u8>>;
}

/// WebP in, PNG out.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpToPng;

impl ImageCodec for WebpToPng {
    fn decode(&self, data: &[u8]) -> ImageResult<DynamicImage> {
        image::load_from_memory_with_format(data, ImageFormat::WebP)
    }

    fn encode(&self, image: &DynamicImage) -> ImageResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}

/// Whether a file name carries the source suffix (case-insensitive).
pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .ends_with(&format!(".{}", SOURCE_EXTENSION))
        })
        .unwrap_or(false)
}

/// Sibling path with the source suffix swapped for the target extension.
///
/// Only the trailing `.webp` is replaced, so a file named just `.webp`
/// becomes `.png` rather than `.webp.png`.
pub fn target_path(source: &Path) -> PathBuf {
    let suffix_len = SOURCE_EXTENSION.len() + 1;
    let stem = source.file_name().and_then(|name| name.to_str()).and_then(|name| {
        let split = name.len().checked_sub(suffix_len)?;
        let (stem, suffix) = (name.get(..split)?, name.get(split..)?);
        (suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(SOURCE_EXTENSION))
            .then_some(stem)
    });

    match stem {
        Some(stem) => source.with_file_name(format!("{}.{}", stem, TARGET_EXTENSION)),
        None => source.with_extension(TARGET_EXTENSION),
    }
}
