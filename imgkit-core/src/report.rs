//! Structured results returned by the image tools
//!
//! Every component operation ends in a [`ToolReport`]; failures are reported,
//! never raised, so the surrounding conversation can continue.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::message::ContentPart;

/// Outcome kind of a tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// Everything requested succeeded
    Success,
    /// Some items succeeded, some failed
    PartialSuccess,
    /// Nothing succeeded
    Error,
}

impl ToolStatus {
    /// Classify a batch by its success and failure counts
    ///
    /// An empty batch is a success.
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => Self::Success,
            (0, _) => Self::Error,
            _ => Self::PartialSuccess,
        }
    }

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::PartialSuccess => "partial_success",
            Self::Error => "error",
        }
    }
}

/// A status, a human-readable message and a typed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReport<T> {
    /// Outcome kind
    pub status: ToolStatus,
    /// Human-readable summary
    pub message: String,
    /// Tool-specific details, flattened into the JSON object
    #[serde(flatten)]
    pub payload: T,
}

impl<T> ToolReport<T> {
    /// Build a report
    pub fn new(status: ToolStatus, message: impl Into<String>, payload: T) -> Self {
        Self {
            status,
            message: message.into(),
            payload,
        }
    }

    /// Whether the status is [`ToolStatus::Success`]
    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }
}

impl<T: Default> ToolReport<T> {
    /// An error report with an empty payload
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToolStatus::Error, message, T::default())
    }
}

impl<T: Serialize> ToolReport<T> {
    /// Serialize to the JSON string handed back to the model
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Payload of `scrape_images_from_urls`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSummary {
    /// URL tokens found in the input
    pub total_urls_processed: usize,
    /// Images written and verified
    pub successful_downloads: usize,
    /// Tokens rejected or failed
    pub failed_downloads: usize,
    /// Filenames created by this call, in input order
    pub images: Vec<String>,
}

/// Payload of `save_image_as_artifact`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSummary {
    /// Published filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Version assigned by the artifact store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// MIME type the artifact was saved with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// An image found on disk by the display reporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedImage {
    /// Tracked filename
    pub filename: String,
    /// Location inside the image store
    pub path: PathBuf,
}

/// Payload of `display_downloaded_images`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySummary {
    /// Tracked images present on disk
    pub displayed_images: Vec<DisplayedImage>,
    /// Tracked images missing from disk
    pub missing_images: Vec<String>,
}

/// Payload of `load_artifacts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadArtifactsSummary {
    /// Artifact names held by the store (listing mode)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifact_names: Vec<String>,
    /// Loaded artifacts as content parts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<LoadedArtifact>,
    /// Requested names the store does not hold
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_found: Vec<String>,
}

/// One artifact loaded for the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedArtifact {
    /// Artifact name
    pub name: String,
    /// Version that was loaded
    pub version: u32,
    /// Content as a message part
    pub content: ContentPart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_counts() {
        assert_eq!(ToolStatus::from_counts(0, 0), ToolStatus::Success);
        assert_eq!(ToolStatus::from_counts(3, 0), ToolStatus::Success);
        assert_eq!(ToolStatus::from_counts(0, 2), ToolStatus::Error);
        assert_eq!(ToolStatus::from_counts(1, 1), ToolStatus::PartialSuccess);
    }

    #[test]
    fn test_report_flattens_payload() {
        let report = ToolReport::new(
            ToolStatus::PartialSuccess,
            "Successfully downloaded 1 images. 1 downloads failed",
            DownloadSummary {
                total_urls_processed: 2,
                successful_downloads: 1,
                failed_downloads: 1,
                images: vec!["downloaded_image_20250101-120000_1.png".to_string()],
            },
        );

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["status"], "partial_success");
        assert_eq!(value["total_urls_processed"], 2);
        assert_eq!(value["images"][0], "downloaded_image_20250101-120000_1.png");
    }

    #[test]
    fn test_error_report_omits_empty_publish_fields() {
        let report: ToolReport<PublishSummary> = ToolReport::error("Image file not found: x.png");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "status": "error", "message": "Image file not found: x.png" })
        );
    }
}
