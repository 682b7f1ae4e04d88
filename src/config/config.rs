//! # Configuration Module
//!
//! This module provides the configuration structure and validation for
//! icon container conversion. It is the common interface between the CLI
//! and the library: every tunable is decided once, here, and then passed
//! into [`IconSetBuilder`](crate::builder::IconSetBuilder).
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `use_native_tool` | `bool` | true/false | Extract with `iconutil` instead of the built-in decoder |
//! | `max_parallelism` | `usize` | ≥ 1 | Upper bound on concurrent resize units |
//! | `auxiliary_sizes` | `Vec<u32>` | 1-1024, unique | Extra sizes derived on top of the native catalog |
//! | `filter` | `ResampleFilter` | see `iconset-scale` | Resampling kernel |
//! | `temp_root` | `Option<PathBuf>` | existing dir | Parent of the per-run workspace |
//!
//! ## Backend Selection
//!
//! `iconutil` only exists on macOS. [`ConvertConfig::from_env`] enables it
//! there unless `FORCE_ICNS2PNG` is set, which forces the portable decoder.
//! The environment is read only in `from_env`, never during a conversion.
//!
//! ## Examples
//!
//! ```rust
//! use icns2png::config::ConvertConfig;
//!
//! let mut config = ConvertConfig::default();
//! config.use_native_tool = false;
//! config.max_parallelism = 2;
//! assert!(config.validate().is_ok());
//!
//! config.max_parallelism = 0;
//! assert!(config.validate().is_err());
//! ```

use crate::catalog::DEFAULT_AUXILIARY_SIZES;
use crate::resize::ResizeOptions;
use iconset_scale::ResampleFilter;
use std::path::PathBuf;

/// Setting this variable (to any value) disables the native tool in
/// [`ConvertConfig::from_env`].
pub const FORCE_DECODER_ENV: &str = "FORCE_ICNS2PNG";

/// Largest auxiliary size accepted by [`ConvertConfig::validate`].
pub const MAX_ICON_SIZE: u32 = 1024;

/// Configuration for one or more container conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Whether to unpack the container with the platform `iconutil` tool.
    ///
    /// When `false`, the built-in ICNS decoder is used. The decoder works on
    /// every platform but cannot read JPEG 2000 encoded elements.
    pub use_native_tool: bool,

    /// Maximum number of resize units running at once.
    ///
    /// The effective bound is `min(missing sizes, max_parallelism)`.
    pub max_parallelism: usize,

    /// Sizes that are always derived unless the container already has them.
    pub auxiliary_sizes: Vec<u32>,

    /// Resampling kernel used for every derived size.
    pub filter: ResampleFilter,

    /// Directory in which the `.iconset` workspace is created.
    ///
    /// `None` uses the system temporary directory.
    pub temp_root: Option<PathBuf>,
}

impl Default for ConvertConfig {
    /// Default values:
    /// - `use_native_tool`: true on macOS, false elsewhere
    /// - `max_parallelism`: number of available CPUs
    /// - `auxiliary_sizes`: `[24, 96]`
    /// - `filter`: Lanczos3
    /// - `temp_root`: system temp dir
    fn default() -> Self {
        Self {
            use_native_tool: cfg!(target_os = "macos"),
            max_parallelism: available_cpus(),
            auxiliary_sizes: DEFAULT_AUXILIARY_SIZES.to_vec(),
            filter: ResampleFilter::default(),
            temp_root: None,
        }
    }
}

impl ConvertConfig {
    /// Creates a new configuration with the specified parameters.
    pub fn new(
        use_native_tool: bool,
        max_parallelism: usize,
        auxiliary_sizes: Vec<u32>,
        filter: ResampleFilter,
        temp_root: Option<PathBuf>,
    ) -> Self {
        Self {
            use_native_tool,
            max_parallelism,
            auxiliary_sizes,
            filter,
            temp_root,
        }
    }

    /// Defaults, with the backend chosen from the platform and
    /// `FORCE_ICNS2PNG`.
    pub fn from_env() -> Self {
        let forced = std::env::var_os(FORCE_DECODER_ENV).is_some();
        Self {
            use_native_tool: cfg!(target_os = "macos") && !forced,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_parallelism == 0 {
            return Err("max_parallelism must be greater than 0".to_string());
        }
        for (index, &size) in self.auxiliary_sizes.iter().enumerate() {
            if size == 0 || size > MAX_ICON_SIZE {
                return Err(format!(
                    "auxiliary size {} must be between 1 and {}",
                    size, MAX_ICON_SIZE
                ));
            }
            if self.auxiliary_sizes[..index].contains(&size) {
                return Err(format!("auxiliary size {} is listed twice", size));
            }
        }
        if let Some(root) = &self.temp_root {
            if !root.is_dir() {
                return Err(format!("temp root '{}' is not a directory", root.display()));
            }
        }
        Ok(())
    }

    /// Scheduler options derived from this configuration.
    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            max_parallelism: self.max_parallelism,
            filter: self.filter,
        }
    }
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
