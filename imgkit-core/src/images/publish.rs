//! Artifact publisher
//!
//! Promotes a stored image into the artifact store. State is only touched
//! after the store confirms the save.

use tracing::{debug, info, instrument, warn};

use crate::artifact::ArtifactStore;
use crate::error::Error;
use crate::report::{PublishSummary, ToolReport, ToolStatus};
use crate::state::SharedState;
use crate::store::images::{mime_type_for, LocalImageStore};

/// Publishes downloaded images as artifacts
#[derive(Debug, Clone)]
pub struct ArtifactPublisher {
    store: LocalImageStore,
}

impl ArtifactPublisher {
    /// Create a publisher reading from `store`
    pub fn new(store: LocalImageStore) -> Self {
        Self { store }
    }

    /// Publish `filename` and mark it `artifact_saved`
    #[instrument(skip(self, state, artifacts))]
    pub async fn publish(
        &self,
        filename: &str,
        state: &mut SharedState,
        artifacts: &dyn ArtifactStore,
    ) -> ToolReport<PublishSummary> {
        if let Err(e) = self.store.path_for(filename) {
            warn!(error = %e, "Rejected image filename");
            return ToolReport::error(e.to_string());
        }
        if !self.store.exists(filename).await {
            return ToolReport::error(Error::ImageNotFound(filename.to_string()).to_string());
        }

        let data = match self.store.read(filename).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Failed to read image");
                return ToolReport::error(format!("Error saving image as artifact: {}", e));
            }
        };

        let mime_type = mime_type_for(filename);
        debug!(bytes = data.len(), mime_type, "Saving artifact");

        let receipt = match artifacts.save(filename, data, mime_type).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Artifact store rejected image");
                return ToolReport::error(format!("Error saving image as artifact: {}", e));
            }
        };

        state.mark_artifact_saved(filename);
        info!(version = receipt.version, "Image saved as artifact");

        ToolReport::new(
            ToolStatus::Success,
            format!("Image saved as artifact: {}", filename),
            PublishSummary {
                filename: Some(filename.to_string()),
                version: Some(receipt.version),
                mime_type: Some(mime_type.to_string()),
            },
        )
    }
}
