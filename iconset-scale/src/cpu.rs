// SPDX-License-Identifier: MIT
// CPU resampler built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → RGBA8 out, alpha premultiplied during convolution.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{ResizeOptions, Resizer};
use image::RgbaImage;

use crate::filter::ResampleFilter;

#[derive(Debug)]
pub enum ScaleError {
    ZeroDimension { width: u32, height: u32 },
    BufferMismatch,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::ZeroDimension { width, height } => {
                write!(f, "Cannot resample with a zero dimension ({}x{})", width, height)
            }
            ScaleError::BufferMismatch => write!(f, "Resampled buffer does not match target dimensions"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Main resampling entry point.
/// The source is only read; a new tightly packed RGBA buffer is returned.
/// Same-size requests return a copy without touching the resizer.
pub fn resize_rgba(
    resizer: &mut Resizer,
    src: &RgbaImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, ScaleError> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ScaleError::ZeroDimension { width: src_w, height: src_h });
    }
    if width == 0 || height == 0 {
        return Err(ScaleError::ZeroDimension { width, height });
    }
    if (src_w, src_h) == (width, height) {
        return Ok(src.clone());
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(src_w, src_h, src.as_raw())?;

    let mut dst = vec![0u8; (width as usize) * (height as usize) * 4];
    {
        let mut dst_view = TypedImage::<U8x4>::from_buffer(width, height, dst.as_mut_slice())?;
        let opts = ResizeOptions::new().resize_alg(filter.to_alg());
        resizer.resize_typed::<U8x4>(&src_view, &mut dst_view, &opts)?;
    }

    RgbaImage::from_raw(width, height, dst).ok_or(ScaleError::BufferMismatch)
}
