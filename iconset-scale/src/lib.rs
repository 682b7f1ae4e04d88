// SPDX-License-Identifier: MIT
//! # iconset-scale: RGBA Resampling for Icon Sets
//!
//! This crate provides the resampling step used when deriving missing icon
//! sizes from the largest image available in an icon container. It wraps
//! `fast_image_resize` so callers only deal with `image::RgbaImage` buffers.
//!
//! ## Key Components
//!
//! - [`filter`]: Resampling filter selection (Lanczos3 by default)
//! - [`cpu`]: CPU resize entry points built on SIMD-accelerated convolution
//!
//! ## Alpha Handling
//!
//! Icons almost always carry transparency. Resizing is done with alpha
//! premultiplication enabled so that fully transparent pixels do not bleed
//! their (usually black) color into the antialiased edges.
//!
//! ## Usage Example
//!
//! ```rust
//! use fast_image_resize::Resizer;
//! use iconset_scale::{ResampleFilter, resize_rgba};
//! use image::RgbaImage;
//!
//! let source = RgbaImage::from_pixel(512, 512, image::Rgba([10, 20, 30, 255]));
//! let mut resizer = Resizer::new();
//! let icon = resize_rgba(&mut resizer, &source, 32, 32, ResampleFilter::Lanczos3).unwrap();
//! assert_eq!(icon.dimensions(), (32, 32));
//! ```

pub mod cpu;
pub mod filter;

pub use cpu::{ScaleError, resize_rgba};
pub use filter::ResampleFilter;
