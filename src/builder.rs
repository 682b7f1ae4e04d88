//! # Iconset Builder
//!
//! End-to-end conversion of one container:
//!
//! ```text
//! container ──extract──▶ available ──select──▶ (source, missing)
//!                                                   │
//!                  sorted iconset ◀──merge── resize_missing
//! ```
//!
//! Every failure aborts the build and is returned with the container path
//! as context. Nothing is retried.

use crate::catalog::NATIVE_SIZES;
use crate::codec;
use crate::config::ConvertConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::extract::{Extractor, IcnsDecoder, IconutilExtractor};
use crate::icon::{IconDescriptor, IconsetLayout};
use crate::resize::resize_missing;
use crate::select::select_source_and_gaps;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Suffix of every workspace directory created by [`IconSetBuilder::build`].
pub const WORKSPACE_SUFFIX: &str = ".iconset";

/// Converts icon containers into sorted sets of PNG files.
///
/// The extraction backend is fixed at construction from
/// [`ConvertConfig::use_native_tool`].
pub struct IconSetBuilder {
    config: ConvertConfig,
    extractor: Arc<dyn Extractor>,
}

impl IconSetBuilder {
    /// Validate `config` and pick the backend it asks for.
    pub fn new(config: ConvertConfig) -> ConvertResult<Self> {
        let extractor: Arc<dyn Extractor> = if config.use_native_tool {
            Arc::new(IconutilExtractor::default())
        } else {
            Arc::new(IcnsDecoder)
        };
        Self::with_extractor(config, extractor)
    }

    /// Validate `config` and use a caller-supplied backend.
    pub fn with_extractor(config: ConvertConfig, extractor: Arc<dyn Extractor>) -> ConvertResult<Self> {
        config
            .validate()
            .map_err(|reason| ConvertError::config("convert_config", format!("{:?}", config), reason))?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Convert `container` inside a fresh `.iconset` workspace.
    ///
    /// On success the workspace is left in place and belongs to the caller;
    /// every returned path lives inside it. On failure the workspace is
    /// removed, since its path was never handed out.
    pub async fn build(&self, container: &Path) -> ConvertResult<Vec<IconDescriptor>> {
        let workspace = self.create_workspace()?;
        debug!(workspace = %workspace.display(), "Created workspace");

        match self.build_in(container, &workspace).await {
            Ok(icons) => Ok(icons),
            Err(err) => {
                if let Err(cleanup) = tokio::fs::remove_dir_all(&workspace).await {
                    warn!(
                        workspace = %workspace.display(),
                        error = %cleanup,
                        "Failed to remove workspace after error"
                    );
                }
                Err(err)
            }
        }
    }

    /// Convert `container` into an existing, caller-owned `workspace`.
    ///
    /// Returns one descriptor per size, sorted ascending.
    pub async fn build_in(&self, container: &Path, workspace: &Path) -> ConvertResult<Vec<IconDescriptor>> {
        let context = || format!("converting '{}'", container.display());

        let available = self
            .extractor
            .extract(container, workspace)
            .await
            .map_err(|e| e.with_context(context()))?;
        debug!(
            backend = self.extractor.name(),
            sizes = ?available.keys().collect::<Vec<_>>(),
            "Extraction complete"
        );

        let selection = select_source_and_gaps(&available, &NATIVE_SIZES, &self.config.auxiliary_sizes)
            .map_err(|e| e.for_container(container).with_context(context()))?;

        let produced = if selection.missing.is_empty() {
            Vec::new()
        } else {
            let source = load_source(&selection.source.path)
                .await
                .map_err(|e| e.with_context(context()))?;
            resize_missing(
                source,
                selection.source.size,
                &selection.missing,
                &IconsetLayout::new(workspace),
                self.config.resize_options(),
            )
            .await
            .map_err(|e| e.with_context(context()))?
        };

        let derived = produced.len();
        let mut icons: Vec<IconDescriptor> = available.into_values().chain(produced).collect();
        icons.sort();
        debug_assert!(icons.windows(2).all(|pair| pair[0].size < pair[1].size));

        info!(
            container = %container.display(),
            source_size = selection.source.size,
            derived,
            total = icons.len(),
            "Iconset ready"
        );
        Ok(icons)
    }

    fn create_workspace(&self) -> ConvertResult<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("icns2png-").suffix(WORKSPACE_SUFFIX).keep(true);
        let dir = match &self.config.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| ConvertError::io("create workspace", self.config.temp_root.as_deref(), e))?;
        Ok(dir.path().to_path_buf())
    }
}

/// Decode the resampling source on the blocking pool.
async fn load_source(path: &Path) -> ConvertResult<Arc<image::RgbaImage>> {
    let owned = path.to_path_buf();
    let image = tokio::task::spawn_blocking(move || codec::load_rgba(&owned))
        .await
        .map_err(|e| ConvertError::decode(path, e))??;
    Ok(Arc::new(image))
}

/// Convert one ICNS file using [`ConvertConfig::from_env`].
///
/// Returns `{path, size}` descriptors sorted ascending by size. The
/// `.iconset` directory holding them is not deleted; removing it is up to
/// the caller.
pub async fn convert_icns_to_png(container: impl AsRef<Path>) -> ConvertResult<Vec<IconDescriptor>> {
    IconSetBuilder::new(ConvertConfig::from_env())?
        .build(container.as_ref())
        .await
}
