//! Display reporter
//!
//! Reconciles tracked filenames against the image directory. Read-only with
//! respect to [`SharedState`].

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::display::{DisplayError, ImageDisplay};
use crate::report::{DisplaySummary, DisplayedImage, ToolReport, ToolStatus};
use crate::state::SharedState;
use crate::store::images::LocalImageStore;

/// Reports which tracked images are available on disk
#[derive(Clone)]
pub struct DisplayReporter {
    store: LocalImageStore,
    display: Option<Arc<dyn ImageDisplay>>,
}

impl std::fmt::Debug for DisplayReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayReporter")
            .field("store", &self.store)
            .field("display", &self.display.is_some())
            .finish()
    }
}

impl DisplayReporter {
    /// Create a reporter without a display capability
    pub fn new(store: LocalImageStore) -> Self {
        Self {
            store,
            display: None,
        }
    }

    /// Attach a display capability
    pub fn with_display(mut self, display: Arc<dyn ImageDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    /// Check every tracked image and render the ones present
    #[instrument(skip(self, state), fields(tracked = state.len()))]
    pub async fn report(&self, state: &SharedState) -> ToolReport<DisplaySummary> {
        let Some(images) = state.images() else {
            return ToolReport::error("Image tracking not found in state");
        };
        if images.is_empty() {
            return ToolReport::new(
                ToolStatus::Success,
                "No images have been downloaded yet",
                DisplaySummary::default(),
            );
        }

        let mut summary = DisplaySummary::default();
        for filename in images.keys() {
            let path = match self.store.path_for(filename) {
                Ok(path) => path,
                Err(_) => {
                    summary.missing_images.push(filename.clone());
                    continue;
                }
            };
            if !self.store.exists(filename).await {
                summary.missing_images.push(filename.clone());
                continue;
            }

            if let Some(display) = &self.display {
                match display.render(filename, &path).await {
                    Ok(()) => {}
                    Err(DisplayError::Unavailable) => {
                        debug!(%filename, "Display unavailable, reporting as available")
                    }
                    Err(e) => debug!(%filename, error = %e, "Render failed, reporting as available"),
                }
            }

            summary.displayed_images.push(DisplayedImage {
                filename: filename.clone(),
                path,
            });
        }

        let shown = summary.displayed_images.len();
        let missing = summary.missing_images.len();
        let status = ToolStatus::from_counts(shown, missing);
        let message = match status {
            ToolStatus::Success => format!("Displayed {} images", shown),
            ToolStatus::PartialSuccess => {
                format!("Displayed {} images. {} images missing", shown, missing)
            }
            ToolStatus::Error => format!(
                "None of the {} tracked images were found on disk",
                missing
            ),
        };

        ToolReport::new(status, message, summary)
    }
}
