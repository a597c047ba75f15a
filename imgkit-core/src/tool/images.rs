//! Image tools exposed to the agent
//!
//! Thin adapters from the JSON tool-call convention onto the components in
//! [`crate::images`]. Every call returns a serialized [`ToolReport`].

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::ImageToolsConfig;
use crate::display::ImageDisplay;
use crate::error::Result;
use crate::images::{ArtifactPublisher, DisplayReporter, DownloadManager};
use crate::message::ContentPart;
use crate::report::{LoadArtifactsSummary, LoadedArtifact, ToolReport, ToolStatus};
use crate::store::images::LocalImageStore;
use crate::tool::{parse_arguments, Tool, ToolContext, ToolDefinition, ToolSet};

/// Build the standard image tool set
///
/// `display` is optional; without it images are only checked on disk.
pub fn image_tools(
    config: &ImageToolsConfig,
    display: Option<Arc<dyn ImageDisplay>>,
) -> Result<ToolSet> {
    config.validate()?;
    let store = LocalImageStore::new(&config.image_dir);

    let mut reporter = DisplayReporter::new(store.clone());
    if let Some(display) = display {
        reporter = reporter.with_display(display);
    }

    let mut toolset = ToolSet::new();
    toolset
        .add(ScrapeImagesTool::new(DownloadManager::new(config)?))
        .add(SaveImageArtifactTool::new(ArtifactPublisher::new(store)))
        .add(DisplayImagesTool::new(reporter))
        .add(LoadArtifactsTool);
    Ok(toolset)
}

/// `scrape_images_from_urls`: download images into the local store
pub struct ScrapeImagesTool {
    manager: DownloadManager,
}

impl ScrapeImagesTool {
    /// Wrap a download manager
    pub fn new(manager: DownloadManager) -> Self {
        Self { manager }
    }
}

/// URLs as one delimited string or as a list
#[derive(Deserialize)]
#[serde(untagged)]
enum UrlInput {
    Joined(String),
    List(Vec<String>),
}

#[async_trait]
impl Tool for ScrapeImagesTool {
    fn name(&self) -> String {
        "scrape_images_from_urls".to_string()
    }

    async fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: "Download images from URLs and save them locally. Processes every URL \
                in the input (separated by commas or newlines) and tracks the saved filenames \
                in the session state."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "image_urls": {
                        "type": "string",
                        "description": "Image URLs separated by commas or newlines"
                    }
                },
                "required": ["image_urls"]
            }),
            parameters_ts: Some(
                "interface ScrapeArgs {\n  image_urls: string; // URLs separated by commas or newlines\n}"
                    .to_string(),
            ),
        }
    }

    async fn call(&self, ctx: &mut ToolContext<'_>, arguments: &str) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct Args {
            image_urls: UrlInput,
        }

        let args: Args = parse_arguments(&self.name(), arguments)?;
        let report = match args.image_urls {
            UrlInput::Joined(urls) => self.manager.download(&urls, ctx.state_mut()).await,
            // List elements are whole URLs; commas inside them are kept
            UrlInput::List(urls) => self.manager.download_urls(&urls, ctx.state_mut()).await,
        };
        Ok(report.to_json()?)
    }
}

/// `save_image_as_artifact`: publish a downloaded image
pub struct SaveImageArtifactTool {
    publisher: ArtifactPublisher,
}

impl SaveImageArtifactTool {
    /// Wrap a publisher
    pub fn new(publisher: ArtifactPublisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl Tool for SaveImageArtifactTool {
    fn name(&self) -> String {
        "save_image_as_artifact".to_string()
    }

    async fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: "Save a downloaded image as an artifact so it can be loaded for \
                analysis. Marks the image as saved and makes it the current image."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "image_filename": {
                        "type": "string",
                        "description": "Name of a downloaded image file"
                    }
                },
                "required": ["image_filename"]
            }),
            parameters_ts: Some(
                "interface SaveArtifactArgs {\n  image_filename: string; // Downloaded image file\n}"
                    .to_string(),
            ),
        }
    }

    async fn call(&self, ctx: &mut ToolContext<'_>, arguments: &str) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct Args {
            image_filename: String,
        }

        let args: Args = parse_arguments(&self.name(), arguments)?;
        let (state, artifacts) = ctx.state_and_artifacts();
        let report = self
            .publisher
            .publish(args.image_filename.trim(), state, artifacts)
            .await;
        Ok(report.to_json()?)
    }
}

/// `display_downloaded_images`: report which tracked images are on disk
pub struct DisplayImagesTool {
    reporter: DisplayReporter,
}

impl DisplayImagesTool {
    /// Wrap a reporter
    pub fn new(reporter: DisplayReporter) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl Tool for DisplayImagesTool {
    fn name(&self) -> String {
        "display_downloaded_images".to_string()
    }

    async fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: "Show the images downloaded in this session. Returns the filename and \
                local path of each available image and lists any that are missing."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            parameters_ts: Some("interface DisplayArgs {}".to_string()),
        }
    }

    async fn call(&self, ctx: &mut ToolContext<'_>, _arguments: &str) -> anyhow::Result<String> {
        let report = self.reporter.report(ctx.state()).await;
        Ok(report.to_json()?)
    }
}

/// `load_artifacts`: list artifacts or load them as image content
pub struct LoadArtifactsTool;

#[async_trait]
impl Tool for LoadArtifactsTool {
    fn name(&self) -> String {
        "load_artifacts".to_string()
    }

    async fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: "Load saved artifacts so their content can be analyzed. Call without \
                names to list the available artifacts."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "artifact_names": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Artifacts to load (omit to list all)"
                    }
                }
            }),
            parameters_ts: Some(
                "interface LoadArtifactsArgs {\n  artifact_names?: string[]; // Omit to list all\n}"
                    .to_string(),
            ),
        }
    }

    async fn call(&self, ctx: &mut ToolContext<'_>, arguments: &str) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default)]
            artifact_names: Vec<String>,
        }

        let args: Args = parse_arguments(&self.name(), arguments)?;
        let artifacts = ctx.artifacts();

        if args.artifact_names.is_empty() {
            let report = match artifacts.list().await {
                Ok(names) => ToolReport::new(
                    ToolStatus::Success,
                    format!("{} artifacts available", names.len()),
                    LoadArtifactsSummary {
                        artifact_names: names,
                        ..Default::default()
                    },
                ),
                Err(e) => ToolReport::error(format!("Error listing artifacts: {}", e)),
            };
            return Ok(report.to_json()?);
        }

        let mut summary = LoadArtifactsSummary::default();
        for name in &args.artifact_names {
            match artifacts.load(name, None).await {
                Ok(Some(artifact)) => summary.artifacts.push(LoadedArtifact {
                    name: artifact.name,
                    version: artifact.version,
                    content: ContentPart::image_bytes(artifact.mime_type, &artifact.data),
                }),
                Ok(None) => summary.not_found.push(name.clone()),
                Err(e) => {
                    tracing::warn!(artifact = %name, error = %e, "Artifact load failed");
                    summary.not_found.push(name.clone());
                }
            }
        }

        let loaded = summary.artifacts.len();
        let missing = summary.not_found.len();
        let status = ToolStatus::from_counts(loaded, missing);
        let message = match status {
            ToolStatus::Success => format!("Loaded {} artifacts", loaded),
            ToolStatus::PartialSuccess => {
                format!("Loaded {} artifacts. {} not found", loaded, missing)
            }
            ToolStatus::Error => format!("None of the {} requested artifacts were found", missing),
        };
        Ok(ToolReport::new(status, message, summary).to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactStore, InMemoryArtifactStore};
    use crate::state::SharedState;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_load_artifacts_lists_and_loads() {
        let store = Arc::new(InMemoryArtifactStore::new());
        store
            .save("a.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        let mut state = SharedState::new();
        let mut ctx = ToolContext::new("s", &mut state, store.clone());

        let listed: serde_json::Value =
            serde_json::from_str(&LoadArtifactsTool.call(&mut ctx, "").await.unwrap()).unwrap();
        assert_eq!(listed["status"], "success");
        assert_eq!(listed["artifact_names"], serde_json::json!(["a.png"]));

        let loaded: serde_json::Value = serde_json::from_str(
            &LoadArtifactsTool
                .call(&mut ctx, r#"{"artifact_names": ["a.png", "b.png"]}"#)
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(loaded["status"], "partial_success");
        assert_eq!(loaded["artifacts"][0]["name"], "a.png");
        assert_eq!(loaded["artifacts"][0]["content"]["type"], "image");
        assert_eq!(
            loaded["artifacts"][0]["content"]["source"]["media_type"],
            "image/png"
        );
        assert_eq!(loaded["not_found"], serde_json::json!(["b.png"]));
    }

    #[tokio::test]
    async fn test_scrape_accepts_url_list() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ScrapeImagesTool::new(
            DownloadManager::new(&ImageToolsConfig::new(dir.path())).unwrap(),
        );
        let mut state = SharedState::new();
        let mut ctx = ToolContext::new("s", &mut state, Arc::new(InMemoryArtifactStore::new()));

        let out: serde_json::Value = serde_json::from_str(
            &tool
                .call(&mut ctx, r#"{"image_urls": ["not-a-url", "  "]}"#)
                .await
                .unwrap(),
        )
        .unwrap();

        assert_eq!(out["status"], "error");
        assert_eq!(out["total_urls_processed"], 1);
        assert_eq!(out["failed_downloads"], 1);
    }

    #[tokio::test]
    async fn test_scrape_list_keeps_commas_inside_urls() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ScrapeImagesTool::new(
            DownloadManager::new(&ImageToolsConfig::new(dir.path())).unwrap(),
        );
        let mut state = SharedState::new();
        let mut ctx = ToolContext::new("s", &mut state, Arc::new(InMemoryArtifactStore::new()));

        let out: serde_json::Value = serde_json::from_str(
            &tool
                .call(&mut ctx, r#"{"image_urls": ["http://127.0.0.1:9/a.png?size=1,2"]}"#)
                .await
                .unwrap(),
        )
        .unwrap();

        assert_eq!(out["total_urls_processed"], 1);
        assert_eq!(out["failed_downloads"], 1);
    }

    #[tokio::test]
    async fn test_save_requires_filename() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SaveImageArtifactTool::new(ArtifactPublisher::new(LocalImageStore::new(
            dir.path(),
        )));
        let mut state = SharedState::new();
        let mut ctx = ToolContext::new("s", &mut state, Arc::new(InMemoryArtifactStore::new()));

        let err = tool.call(&mut ctx, "{}").await.unwrap_err();
        assert!(err.to_string().contains("save_image_as_artifact"));
    }
}
