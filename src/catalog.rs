//! # Size Catalog
//!
//! The fixed, ascending list of sizes an ICNS container can carry natively,
//! each tagged with the OSType of the element that stores it, plus the
//! auxiliary sizes an iconset always wants even though ICNS has no slot for
//! them.

/// One native size of the container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEntry {
    /// Four-character ICNS element type (OSType).
    pub format_id: &'static str,
    /// Edge length in pixels.
    pub size: u32,
}

/// Native ICNS sizes, ascending by size.
pub const NATIVE_SIZES: [SizeEntry; 7] = [
    SizeEntry { format_id: "is32", size: 16 },
    SizeEntry { format_id: "il32", size: 32 },
    SizeEntry { format_id: "ih32", size: 48 },
    SizeEntry { format_id: "icp6", size: 64 },
    SizeEntry { format_id: "it32", size: 128 },
    SizeEntry { format_id: "ic08", size: 256 },
    SizeEntry { format_id: "ic09", size: 512 },
];

/// Sizes requested on top of the native catalog unless already present.
pub const DEFAULT_AUXILIARY_SIZES: [u32; 2] = [24, 96];

/// Returns the catalog entry for `size`, if it is a native size.
pub fn native_entry(size: u32) -> Option<&'static SizeEntry> {
    NATIVE_SIZES.iter().find(|entry| entry.size == size)
}

/// Whether `size` is part of the native catalog.
pub fn is_native(size: u32) -> bool {
    native_entry(size).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_strictly_ascending() {
        assert!(NATIVE_SIZES.windows(2).all(|pair| pair[0].size < pair[1].size));
    }

    #[test]
    fn test_auxiliary_sizes_are_not_native() {
        for size in DEFAULT_AUXILIARY_SIZES {
            assert!(!is_native(size), "{} must not be a native size", size);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(native_entry(48).map(|e| e.format_id), Some("ih32"));
        assert_eq!(native_entry(512).map(|e| e.format_id), Some("ic09"));
        assert!(native_entry(1024).is_none());
    }
}
