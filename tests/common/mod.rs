//! Common test utilities for the icns2png integration tests
//!
//! Fixtures are generated on the fly: gradient PNGs for the resize path, a
//! fake extractor that serves them, and real ICNS containers written with
//! the `icns` crate for the decoder path.

#![allow(dead_code)]

use async_trait::async_trait;
use icns2png::{AvailableIcons, ConvertConfig, ConvertError, ConvertResult, Extractor, IconDescriptor, IconsetLayout};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Square test image with a diagonal gradient so resampling has work to do
pub fn gradient(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let r = (x * 255 / size.max(1)) as u8;
        let g = (y * 255 / size.max(1)) as u8;
        Rgba([r, g, 128, 255])
    })
}

/// Solid colour the fixture extractor paints the `size` image with
pub fn fixture_colour(size: u32) -> Rgba<u8> {
    let hash = size.wrapping_mul(2_654_435_761);
    Rgba([(hash >> 24) as u8, (hash >> 16) as u8, (hash >> 8) as u8, 255])
}

/// Assert every pixel of the PNG at `path` is within one step of `colour`
pub fn assert_colour(path: &Path, colour: Rgba<u8>) {
    let image = icns2png::codec::load_rgba(path).expect("decodable icon");
    for pixel in image.pixels() {
        for (got, want) in pixel.0.iter().zip(colour.0) {
            assert!(got.abs_diff(want) <= 1, "{}: {:?} vs {:?}", path.display(), pixel, colour);
        }
    }
}

/// Configuration pointed at a scratch directory, built-in decoder
pub fn test_config(temp_root: &Path, max_parallelism: usize) -> ConvertConfig {
    ConvertConfig {
        use_native_tool: false,
        max_parallelism,
        temp_root: Some(temp_root.to_path_buf()),
        ..ConvertConfig::default()
    }
}

/// Sizes of a descriptor list, in list order
pub fn sizes(icons: &[IconDescriptor]) -> Vec<u32> {
    icons.iter().map(|icon| icon.size).collect()
}

/// Extractor that writes one solid PNG per size, coloured by [`fixture_colour`]
pub struct FixtureExtractor {
    sizes: Vec<u32>,
    calls: AtomicUsize,
}

impl FixtureExtractor {
    pub fn new(sizes: &[u32]) -> Self {
        Self {
            sizes: sizes.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for FixtureExtractor {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn extract(&self, _container: &Path, output_dir: &Path) -> ConvertResult<AvailableIcons> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let layout = IconsetLayout::new(output_dir);
        let mut available = AvailableIcons::new();
        for &size in &self.sizes {
            let path = layout.path_for(size);
            RgbaImage::from_pixel(size, size, fixture_colour(size))
                .save(&path)
                .map_err(|e| ConvertError::resize_or_save(size, &path, "fixture write failed").with_source(e))?;
            available.insert(size, IconDescriptor::new(path, size));
        }
        Ok(available)
    }
}

/// Extractor that always fails the way a broken `iconutil` run does
pub struct FailingExtractor;

#[async_trait]
impl Extractor for FailingExtractor {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn extract(&self, container: &Path, _output_dir: &Path) -> ConvertResult<AvailableIcons> {
        Err(ConvertError::extraction("failing", container, "exit status: 1").with_output("iconutil: invalid iconset"))
    }
}

/// Write a real ICNS container holding one gradient element per type
pub fn write_icns(path: &Path, types: &[icns::IconType]) {
    let mut family = icns::IconFamily::new();
    for &icon_type in types {
        let size = icon_type.pixel_width();
        let image = icns::Image::from_data(icns::PixelFormat::RGBA, size, size, gradient(size).into_raw())
            .expect("gradient buffer matches element size");
        family
            .add_icon_with_type(&image, icon_type)
            .expect("element type accepts RGBA image");
    }
    let file = std::fs::File::create(path).expect("create container");
    family.write(std::io::BufWriter::new(file)).expect("write container");
}
