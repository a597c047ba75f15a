//! Per-session shared state coordinating the image tools
//!
//! Serializes to the same shape the hosting agent keeps in its session state:
//!
//! ```json
//! { "images": { "downloaded_image_20250101-120000_1.png": "artifact_saved" },
//!   "current_image": "downloaded_image_20250101-120000_1.png" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a tracked image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStatus {
    /// Downloaded, not yet published as an artifact
    #[serde(rename = "")]
    Downloaded,
    /// Published to the artifact store
    #[serde(rename = "artifact_saved")]
    ArtifactSaved,
}

/// Mutable state threaded through every tool invocation of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    /// Tracked images; `None` until a tool first initializes tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<BTreeMap<String, ImageStatus>>,
    /// Most recently published image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_image: Option<String>,
}

impl SharedState {
    /// Create a state with no image tracking
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether image tracking has been initialized
    pub fn is_tracking(&self) -> bool {
        self.images.is_some()
    }

    /// Initialize image tracking if absent and return the mapping
    pub fn ensure_images(&mut self) -> &mut BTreeMap<String, ImageStatus> {
        self.images.get_or_insert_with(BTreeMap::new)
    }

    /// Tracked images, or `None` when tracking was never initialized
    pub fn images(&self) -> Option<&BTreeMap<String, ImageStatus>> {
        self.images.as_ref()
    }

    /// Status of one image
    pub fn status(&self, filename: &str) -> Option<ImageStatus> {
        self.images.as_ref()?.get(filename).copied()
    }

    /// Whether `filename` is tracked
    pub fn contains(&self, filename: &str) -> bool {
        self.status(filename).is_some()
    }

    /// Record a freshly downloaded image
    pub fn record_download(&mut self, filename: impl Into<String>) {
        self.ensure_images()
            .insert(filename.into(), ImageStatus::Downloaded);
    }

    /// Mark an image as published and make it the current image
    pub fn mark_artifact_saved(&mut self, filename: impl Into<String>) {
        let filename = filename.into();
        self.ensure_images()
            .insert(filename.clone(), ImageStatus::ArtifactSaved);
        self.current_image = Some(filename);
    }

    /// Most recently published image
    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }

    /// Number of tracked images
    pub fn len(&self) -> usize {
        self.images.as_ref().map_or(0, BTreeMap::len)
    }

    /// True when no image is tracked (or tracking is absent)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
