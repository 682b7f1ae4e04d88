//! # ICNS to PNG Iconset Library
//!
//! Turns an Apple ICNS icon container into a complete, sorted set of
//! square PNG files, one per size, ready for toolkits that take a list of
//! `{path, size}` icons.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `extract`: Backends that unpack the container (`iconutil` or the built-in decoder)
//! - `select`: Picks the largest image as resampling source and computes missing sizes
//! - `resize`: Bounded-parallel derivation of missing sizes
//! - `builder`: Orchestrates one conversion end to end
//! - `config`: Configuration management and validation
//!
//! Resampling itself lives in the `iconset-scale` workspace crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let icons = icns2png::convert_icns_to_png("AppIcon.icns").await?;
//! for icon in &icons {
//!     println!("{} {}", icon.size, icon.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod icon;
pub mod logging;
pub mod resize;
pub mod select;

pub use builder::{IconSetBuilder, convert_icns_to_png};
pub use config::ConvertConfig;
pub use error::{ConvertError, ConvertResult, ErrorKind};
pub use extract::{Extractor, IcnsDecoder, IconutilExtractor};
pub use icon::{AvailableIcons, IconDescriptor, IconsetLayout};
pub use iconset_scale::ResampleFilter;
