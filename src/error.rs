//! # Error Handling
//!
//! Error types for the iconset conversion pipeline.
//!
//! ## Architecture
//!
//! Every failure is a [`ConvertError`]. Each variant maps onto one
//! [`ErrorKind`] and carries an [`ErrorContext`] so callers can see which
//! container, file, or target size was involved without parsing messages.
//!
//! All kinds are fatal for the conversion that raised them. Nothing in the
//! library retries; a caller that wants retries wraps the whole call.
//!
//! ## Usage
//!
//! ```rust
//! use icns2png::error::{ConvertError, ErrorKind};
//!
//! let error = ConvertError::resize_or_save(48, "/tmp/x.iconset/icon_48x48.png", "disk full")
//!     .with_context("converting app.icns");
//!
//! assert_eq!(error.kind(), ErrorKind::ResizeOrSaveFailed);
//! assert_eq!(error.context().metadata.get("size").map(String::as_str), Some("48"));
//! ```

use std::collections::HashMap;
use std::{error::Error as StdError, fmt, path::Path};

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The unpacking tool or the fallback decoder failed.
    ExtractionFailed,
    /// Extraction produced no image usable as a resampling source.
    NoSourceImage,
    /// The chosen source image could not be decoded.
    DecodeFailed,
    /// A resize-and-save unit failed.
    ResizeOrSaveFailed,
    /// Workspace or file-system failure outside the units above.
    Io,
    /// Invalid configuration.
    Config,
}

/// Metadata about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Free-form context added while the error propagated
    pub context: Option<String>,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation that was being performed
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Base error type for the conversion library
#[derive(Debug)]
pub enum ConvertError {
    /// The extraction backend failed
    ExtractionFailed {
        backend: String,
        container: String,
        reason: String,
        /// Captured tool output, if the backend was a subprocess
        output: Option<String>,
        source: Option<std::io::Error>,
        context: ErrorContext,
    },
    /// No image was available to resample from
    NoSourceImage {
        container: Option<String>,
        context: ErrorContext,
    },
    /// The source image could not be decoded
    DecodeFailed {
        path: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
    /// A single resize-and-save unit failed
    ResizeOrSaveFailed {
        size: u32,
        path: String,
        reason: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
}

impl ConvertError {
    /// Create an extraction error
    pub fn extraction(
        backend: impl Into<String>,
        container: &Path,
        reason: impl Into<String>,
    ) -> Self {
        Self::ExtractionFailed {
            backend: backend.into(),
            container: container.display().to_string(),
            reason: reason.into(),
            output: None,
            source: None,
            context: ErrorContext::new().with_operation("extract"),
        }
    }

    /// Create an extraction error caused by an I/O failure
    pub fn extraction_io(backend: impl Into<String>, container: &Path, source: std::io::Error) -> Self {
        Self::ExtractionFailed {
            backend: backend.into(),
            container: container.display().to_string(),
            reason: source.to_string(),
            output: None,
            source: Some(source),
            context: ErrorContext::new().with_operation("extract"),
        }
    }

    /// Create a missing-source error
    pub fn no_source_image() -> Self {
        Self::NoSourceImage {
            container: None,
            context: ErrorContext::new().with_operation("select_source"),
        }
    }

    /// Create a decode error
    pub fn decode(path: &Path, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::DecodeFailed {
            path: path.display().to_string(),
            source: Box::new(source),
            context: ErrorContext::new().with_operation("decode_source"),
        }
    }

    /// Create a resize/save error for one target size
    pub fn resize_or_save(size: u32, path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::ResizeOrSaveFailed {
            size,
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
            source: None,
            context: ErrorContext::new()
                .with_operation("resize")
                .with_metadata("size", size.to_string()),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: Option<&Path>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.map(|p| p.display().to_string()),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Attach the captured output of an external tool
    pub fn with_output(mut self, tool_output: impl Into<String>) -> Self {
        if let Self::ExtractionFailed { output, .. } = &mut self {
            *output = Some(tool_output.into());
        }
        self
    }

    /// Attach the underlying cause of a resize/save failure
    pub fn with_source(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        if let Self::ResizeOrSaveFailed { source, .. } = &mut self {
            *source = Some(Box::new(cause));
        }
        self
    }

    /// Record which container the error belongs to
    pub fn for_container(mut self, path: &Path) -> Self {
        if let Self::NoSourceImage { container, .. } = &mut self {
            *container = Some(path.display().to_string());
        }
        self.with_metadata("container", path.display().to_string())
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        let slot = &mut self.context_mut().context;
        *slot = Some(match slot.take() {
            Some(inner) => format!("{}: {}", context, inner),
            None => context,
        });
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            Self::NoSourceImage { .. } => ErrorKind::NoSourceImage,
            Self::DecodeFailed { .. } => ErrorKind::DecodeFailed,
            Self::ResizeOrSaveFailed { .. } => ErrorKind::ResizeOrSaveFailed,
            Self::Io { .. } => ErrorKind::Io,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ExtractionFailed { context, .. } => context,
            Self::NoSourceImage { context, .. } => context,
            Self::DecodeFailed { context, .. } => context,
            Self::ResizeOrSaveFailed { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ExtractionFailed { context, .. } => context,
            Self::NoSourceImage { context, .. } => context,
            Self::DecodeFailed { context, .. } => context,
            Self::ResizeOrSaveFailed { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::ExtractionFailed { .. } => "extraction",
            Self::NoSourceImage { .. } => "no_source_image",
            Self::DecodeFailed { .. } => "decode",
            Self::ResizeOrSaveFailed { .. } => "resize",
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
        }
    }

    /// Output captured from the extraction tool, if any
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::ExtractionFailed { output, .. } => output.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context().context {
            write!(f, "{}: ", context)?;
        }
        match self {
            ConvertError::ExtractionFailed {
                backend,
                container,
                reason,
                ..
            } => {
                write!(f, "Extraction of '{}' with {} failed: {}", container, backend, reason)
            }
            ConvertError::NoSourceImage { container, .. } => {
                if let Some(container) = container {
                    write!(f, "No usable source image found in '{}'", container)
                } else {
                    write!(f, "No usable source image found")
                }
            }
            ConvertError::DecodeFailed { path, source, .. } => {
                write!(f, "Failed to decode source image '{}': {}", path, source)
            }
            ConvertError::ResizeOrSaveFailed {
                size, path, reason, ..
            } => {
                write!(f, "Failed to produce {}x{} icon at '{}': {}", size, size, path, reason)
            }
            ConvertError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(f, "I/O error during {} on '{}': {}", operation, path, source)
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            ConvertError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(f, "Configuration error in '{}': {} (value: {})", field, reason, value)
            }
        }
    }
}

impl StdError for ConvertError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ExtractionFailed {
                source: Some(source),
                ..
            } => Some(source),
            Self::DecodeFailed { source, .. } => Some(source.as_ref()),
            Self::ResizeOrSaveFailed {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type ConvertResult<T> = Result<T, ConvertError>;

impl From<std::io::Error> for ConvertError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", None, error)
    }
}
