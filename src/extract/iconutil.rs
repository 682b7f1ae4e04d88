//! Extraction through Apple's `iconutil` command line tool.

use super::{Extractor, scan_native_icons};
use crate::error::{ConvertError, ConvertResult};
use crate::icon::AvailableIcons;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs `iconutil --convert iconset --output <dir> <container>`.
///
/// Only 1x files for native catalog sizes are picked up afterwards; the
/// `@2x` files iconutil also writes are left alone.
#[derive(Debug, Clone)]
pub struct IconutilExtractor {
    program: PathBuf,
}

impl Default for IconutilExtractor {
    fn default() -> Self {
        Self {
            program: PathBuf::from("iconutil"),
        }
    }
}

impl IconutilExtractor {
    /// Use a different executable with the same command line contract.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Extractor for IconutilExtractor {
    fn name(&self) -> &'static str {
        "iconutil"
    }

    async fn extract(&self, container: &Path, output_dir: &Path) -> ConvertResult<AvailableIcons> {
        debug!(
            program = %self.program.display(),
            container = %container.display(),
            output = %output_dir.display(),
            "Running iconutil"
        );

        let output = Command::new(&self.program)
            .arg("--convert")
            .arg("iconset")
            .arg("--output")
            .arg(output_dir)
            .arg(container)
            .output()
            .await
            .map_err(|e| ConvertError::extraction_io(self.name(), container, e))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            info!(tool_output = %combined.trim(), "iconutil failed");
            return Err(ConvertError::extraction(
                self.name(),
                container,
                format!("{} exited with {}", self.program.display(), output.status),
            )
            .with_output(combined));
        }

        scan_native_icons(output_dir)
            .await
            .map_err(|e| ConvertError::extraction_io(self.name(), container, e))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_tool_failure_is_extraction_failed() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = IconutilExtractor::with_program("false");

        let err = extractor
            .extract(Path::new("app.icns"), dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailed);
        assert!(err.tool_output().is_some());
    }

    #[tokio::test]
    async fn test_missing_tool_is_extraction_failed() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = IconutilExtractor::with_program("/nonexistent/iconutil");

        let err = extractor
            .extract(Path::new("app.icns"), dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailed);
    }

    #[tokio::test]
    async fn test_unlistable_output_is_extraction_failed() {
        let extractor = IconutilExtractor::with_program("true");

        let err = extractor
            .extract(Path::new("app.icns"), Path::new("/no/such/dir"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailed);
        assert!(err.to_string().contains("app.icns"));
    }

    #[tokio::test]
    async fn test_success_scans_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon_32x32.png"), b"").unwrap();
        std::fs::write(dir.path().join("icon_32x32@2x.png"), b"").unwrap();
        let extractor = IconutilExtractor::with_program("true");

        let available = extractor
            .extract(Path::new("app.icns"), dir.path())
            .await
            .unwrap();
        assert_eq!(available.keys().copied().collect::<Vec<_>>(), vec![32]);
    }
}
