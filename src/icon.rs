//! # Icon Data Model
//!
//! Descriptors for produced or discovered images, the size-keyed map the
//! extraction step hands to the selector, and the file naming convention
//! shared by extractors and the resize scheduler.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// One image of the iconset: where it lives and its edge length.
///
/// Ordering is by size first, so sorting a list of descriptors yields the
/// ascending order callers expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconDescriptor {
    pub size: u32,
    pub path: PathBuf,
}

impl IconDescriptor {
    pub fn new(path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            size,
            path: path.into(),
        }
    }
}

/// Images already present after extraction, keyed by size.
pub type AvailableIcons = BTreeMap<u32, IconDescriptor>;

/// Layout of an iconset directory.
///
/// Every image is stored as `icon_<W>x<H>.png` directly inside `dir`, the
/// same convention `iconutil --convert iconset` writes for 1x images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconsetLayout {
    dir: PathBuf,
}

impl IconsetLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name for a square icon of `size` pixels.
    pub fn file_name(size: u32) -> String {
        format!("icon_{}x{}.png", size, size)
    }

    /// Output path for a square icon of `size` pixels.
    pub fn path_for(&self, size: u32) -> PathBuf {
        self.dir.join(Self::file_name(size))
    }

    /// Parse `icon_<W>x<H>.png` back into a size.
    ///
    /// Only square, 1x names match; `@2x` variants and anything else
    /// return `None`.
    pub fn parse_file_name(name: &str) -> Option<u32> {
        let dims = name.strip_prefix("icon_")?.strip_suffix(".png")?;
        let (w, h) = dims.split_once('x')?;
        let w: u32 = w.parse().ok()?;
        let h: u32 = h.parse().ok()?;
        (w == h && w > 0).then_some(w)
    }
}
