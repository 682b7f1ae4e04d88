//! Portable extraction with the `icns` crate.

use super::Extractor;
use crate::catalog::is_native;
use crate::error::{ConvertError, ConvertResult};
use crate::icon::{AvailableIcons, IconDescriptor, IconsetLayout};
use async_trait::async_trait;
use icns::IconFamily;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, warn};

const NAME: &str = "icns-decoder";

/// Decodes every image element of the container and writes it as
/// `icon_<px>x<px>.png`, keyed by pixel width.
///
/// Retina elements share a key with the 1x element of the same pixel size;
/// whichever the container lists first wins. Elements the decoder cannot
/// read (JPEG 2000 payloads) are skipped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcnsDecoder;

#[async_trait]
impl Extractor for IcnsDecoder {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn extract(&self, container: &Path, output_dir: &Path) -> ConvertResult<AvailableIcons> {
        let container_path = container.to_path_buf();
        let layout = IconsetLayout::new(output_dir);
        tokio::task::spawn_blocking(move || decode_family(&container_path, &layout))
            .await
            .map_err(|e| ConvertError::extraction(NAME, container, format!("decoder task failed: {}", e)))?
    }
}

/// Blocking body of [`IcnsDecoder::extract`].
pub fn decode_family(container: &Path, layout: &IconsetLayout) -> ConvertResult<AvailableIcons> {
    let file = File::open(container).map_err(|e| ConvertError::extraction_io(NAME, container, e))?;
    let family =
        IconFamily::read(BufReader::new(file)).map_err(|e| ConvertError::extraction_io(NAME, container, e))?;

    let mut available = AvailableIcons::new();
    for icon_type in family.available_icons() {
        let size = icon_type.pixel_width();
        if available.contains_key(&size) {
            debug!(ostype = %icon_type.ostype(), size, "Size already extracted, skipping element");
            continue;
        }

        let image = match family.get_icon_with_type(icon_type) {
            Ok(image) => image,
            Err(err) => {
                warn!(
                    ostype = %icon_type.ostype(),
                    size,
                    error = %err,
                    "Skipping icon element the decoder cannot read"
                );
                continue;
            }
        };

        let path = layout.path_for(size);
        let out = File::create(&path).map_err(|e| ConvertError::extraction_io(NAME, container, e))?;
        image
            .write_png(BufWriter::new(out))
            .map_err(|e| ConvertError::extraction_io(NAME, container, e))?;

        debug!(
            ostype = %icon_type.ostype(),
            size,
            native = is_native(size),
            path = %path.display(),
            "Extracted icon element"
        );
        available.insert(size, IconDescriptor::new(path, size));
    }

    Ok(available)
}
