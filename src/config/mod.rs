//! # Configuration Module
//!
//! This module provides the configuration structure shared by the CLI and the
//! library entry points.

pub mod config;

pub use config::{ConvertConfig, FORCE_DECODER_ENV, MAX_ICON_SIZE};
