//! # Extraction Backends
//!
//! Unpacks the images embedded in an icon container into a directory and
//! reports which sizes are now available.
//!
//! Two backends implement [`Extractor`]:
//!
//! | Backend | Platform | Notes |
//! |---------|----------|-------|
//! | [`IconutilExtractor`] | macOS | Runs `iconutil`, reads back 1x native sizes |
//! | [`IcnsDecoder`] | any | Decodes with the `icns` crate, no JPEG 2000 |
//!
//! The rest of the pipeline only sees the resulting [`AvailableIcons`] map
//! and does not care which backend produced it.

use crate::catalog::NATIVE_SIZES;
use crate::error::ConvertResult;
use crate::icon::{AvailableIcons, IconDescriptor, IconsetLayout};
use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::path::Path;

pub mod decoder;
pub mod iconutil;

pub use decoder::IcnsDecoder;
pub use iconutil::IconutilExtractor;

/// Unpacks a container into `output_dir`.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Write the container's images into `output_dir` and return them by size.
    ///
    /// An empty map is a valid result; deciding that nothing usable was
    /// found is left to source selection.
    async fn extract(&self, container: &Path, output_dir: &Path) -> ConvertResult<AvailableIcons>;
}

/// List `dir` and keep the `icon_<s>x<s>.png` files whose size is in the
/// native catalog.
pub async fn scan_native_icons(dir: &Path) -> io::Result<AvailableIcons> {
    let mut entries = tokio::fs::read_dir(dir).await?;

    let mut present = HashSet::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(size) = entry.file_name().to_str().and_then(IconsetLayout::parse_file_name) {
            present.insert(size);
        }
    }

    let layout = IconsetLayout::new(dir);
    let available = NATIVE_SIZES
        .iter()
        .filter(|entry| present.contains(&entry.size))
        .map(|entry| (entry.size, IconDescriptor::new(layout.path_for(entry.size), entry.size)))
        .collect();
    Ok(available)
}
