//! Loading of pre-rendered slide images.

use crate::error::{Error, Result};
use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A slide image read from disk, ready to be attached to a model request.
#[derive(Debug, Clone)]
pub struct SlideImage {
    /// Where the image was read from.
    pub path: PathBuf,

    /// MIME type of the encoded data, e.g. "image/jpeg".
    pub mime_type: String,

    /// Encoded image bytes, exactly as stored on disk.
    pub data: Vec<u8>,

    pub width: u32,
    pub height: u32,
}

impl SlideImage {
    /// Read an image file and check that its header decodes.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(path, data)
    }

    /// Build a slide image from bytes already in memory.
    pub fn from_bytes(path: &Path, data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data).map_err(|e| {
            Error::ImageError(format!("Unrecognized image '{}': {}", path.display(), e))
        })?;

        let (width, height) = ImageReader::with_format(Cursor::new(&data), format)
            .into_dimensions()
            .map_err(|e| {
                Error::ImageError(format!("Failed to decode '{}': {}", path.display(), e))
            })?;

        log::debug!(
            "Loaded {} ({:?}, {}x{}, {} bytes)",
            path.display(),
            format,
            width,
            height,
            data.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            mime_type: format.to_mime_type().to_string(),
            data,
            width,
            height,
        })
    }
}

/// A 1x1 grayscale PNG.
#[cfg(test)]
pub(crate) const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A,
    0x7E, 0x9B, 0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
    0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x48, 0xAF, 0xA4, 0x71, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];
