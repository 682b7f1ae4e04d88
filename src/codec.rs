//! # Image Codec
//!
//! Thin wrappers over the `image` crate for the two operations the pipeline
//! needs: decoding a source image into RGBA8 and persisting a derived icon
//! as PNG.

use crate::error::{ConvertError, ConvertResult};
use image::{ImageFormat, ImageReader, ImageResult, RgbaImage};
use std::path::Path;

/// Decode the image at `path` into an RGBA8 buffer.
///
/// The format is sniffed from the file contents, not the extension.
pub fn load_rgba(path: &Path) -> ConvertResult<RgbaImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| ConvertError::decode(path, e))?
        .with_guessed_format()
        .map_err(|e| ConvertError::decode(path, e))?;
    let image = reader.decode().map_err(|e| ConvertError::decode(path, e))?;
    Ok(image.into_rgba8())
}

/// Encode `image` as PNG at `path`, replacing any existing file.
pub fn save_png(image: &RgbaImage, path: &Path) -> ImageResult<()> {
    image.save_with_format(path, ImageFormat::Png)
}
