//! Optional image display capability
//!
//! Rendering is best effort. A missing renderer or a failed render never turns
//! an available image into a failure.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Why an image was not rendered
#[derive(Debug, Error)]
pub enum DisplayError {
    /// No renderer is attached to this process
    #[error("display unavailable")]
    Unavailable,
    /// The renderer failed on this image
    #[error("display failed: {0}")]
    Failed(String),
}

/// Something that can show an image to the user
#[async_trait]
pub trait ImageDisplay: Send + Sync {
    /// Render the image at `path`
    async fn render(&self, filename: &str, path: &Path) -> Result<(), DisplayError>;
}

/// A renderer that is never available (headless processes)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

#[async_trait]
impl ImageDisplay for NoDisplay {
    async fn render(&self, _filename: &str, _path: &Path) -> Result<(), DisplayError> {
        Err(DisplayError::Unavailable)
    }
}

/// A renderer that announces each image through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDisplay;

#[async_trait]
impl ImageDisplay for TracingDisplay {
    async fn render(&self, filename: &str, path: &Path) -> Result<(), DisplayError> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| DisplayError::Failed(e.to_string()))?
            .len();
        tracing::info!(filename, path = %path.display(), size, "Displaying image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_display_is_unavailable() {
        let result = NoDisplay.render("a.png", Path::new("a.png")).await;
        assert!(matches!(result, Err(DisplayError::Unavailable)));
    }

    #[tokio::test]
    async fn test_tracing_display_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TracingDisplay
            .render("gone.png", &dir.path().join("gone.png"))
            .await;
        assert!(matches!(result, Err(DisplayError::Failed(_))));
    }
}
