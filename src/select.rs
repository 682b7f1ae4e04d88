//! # Source Selection
//!
//! Decides which extracted image becomes the resampling source and which
//! target sizes still have to be derived.
//!
//! The source is the largest available image, found with an explicit max
//! reduction over every key of the available map. Sizes outside the native
//! catalog count too, so a 1024px element decoded from a retina slot beats
//! the 512px catalog entry.

use crate::catalog::SizeEntry;
use crate::error::{ConvertError, ConvertResult};
use crate::icon::{AvailableIcons, IconDescriptor};

/// Outcome of source selection for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Largest available image; every derived size is resampled from it.
    pub source: IconDescriptor,
    /// Sizes to derive: absent native sizes in catalog order, then absent
    /// auxiliary sizes in the order given. No size appears twice.
    pub missing: Vec<u32>,
}

/// Pick the resampling source and compute the gaps.
///
/// # Errors
///
/// Returns `NoSourceImage` when `available` is empty.
pub fn select_source_and_gaps(
    available: &AvailableIcons,
    catalog: &[SizeEntry],
    auxiliary: &[u32],
) -> ConvertResult<Selection> {
    let source = available
        .values()
        .max_by_key(|icon| icon.size)
        .cloned()
        .ok_or_else(ConvertError::no_source_image)?;

    let mut missing: Vec<u32> = Vec::with_capacity(catalog.len() + auxiliary.len());
    let native = catalog.iter().map(|entry| entry.size);
    for size in native.chain(auxiliary.iter().copied()) {
        if !available.contains_key(&size) && !missing.contains(&size) {
            missing.push(size);
        }
    }

    tracing::debug!(
        source_size = source.size,
        source = %source.path.display(),
        missing = ?missing,
        "Selected resampling source"
    );

    Ok(Selection { source, missing })
}
