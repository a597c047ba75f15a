//! Download manager
//!
//! Fetches images from caller-supplied URLs into the [`LocalImageStore`] and
//! records each verified file in [`SharedState`]. URLs are processed one at a
//! time; a failure is counted against its URL and the loop moves on.

use chrono::Local;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::ImageToolsConfig;
use crate::error::{Error, Result};
use crate::report::{DownloadSummary, ToolReport, ToolStatus};
use crate::state::SharedState;
use crate::store::images::{LocalImageStore, DEFAULT_EXTENSION, IMAGE_EXTENSIONS};

/// Why a single URL did not produce an image
#[derive(Debug, Error)]
pub enum FetchError {
    /// Token is not an absolute http(s) URL
    #[error("invalid URL format: {0}")]
    InvalidUrl(String),
    /// Server answered with something other than 200
    #[error("unexpected status code {0}")]
    Status(StatusCode),
    /// Response is not image content
    #[error("URL did not return image content (content-type: {0})")]
    NotAnImage(String),
    /// Connection, timeout or body read failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Writing or verifying the file failed
    #[error("{0}")]
    Store(#[from] crate::error::Error),
}

/// Downloads images into the local store
#[derive(Debug, Clone)]
pub struct DownloadManager {
    store: LocalImageStore,
    client: reqwest::Client,
}

impl DownloadManager {
    /// Build a manager with an HTTP client configured from `config`
    pub fn new(config: &ImageToolsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self::with_client(LocalImageStore::new(&config.image_dir), client))
    }

    /// Build a manager around an existing client
    pub fn with_client(store: LocalImageStore, client: reqwest::Client) -> Self {
        Self { store, client }
    }

    /// Store the manager writes into
    pub fn store(&self) -> &LocalImageStore {
        &self.store
    }

    /// Download every URL in `image_urls` (comma and/or newline separated)
    pub async fn download(
        &self,
        image_urls: &str,
        state: &mut SharedState,
    ) -> ToolReport<DownloadSummary> {
        self.download_urls(&split_urls(image_urls), state).await
    }

    /// Download each already-split URL token
    ///
    /// Tokens are trimmed and empty ones dropped, but never split further.
    /// Only a failure to create the image directory aborts the call; every
    /// other problem is counted against its URL.
    #[instrument(skip(self, image_urls, state), fields(dir = %self.store.root().display()))]
    pub async fn download_urls<S: AsRef<str>>(
        &self,
        image_urls: &[S],
        state: &mut SharedState,
    ) -> ToolReport<DownloadSummary> {
        if let Err(e) = self.store.ensure_dir().await {
            warn!(error = %e, "Image directory setup failed");
            return ToolReport::error(format!("Error downloading images: {}", e));
        }
        state.ensure_images();

        let urls: Vec<&str> = image_urls
            .iter()
            .map(|u| u.as_ref().trim())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            return ToolReport::new(
                ToolStatus::Success,
                "No image URLs provided",
                DownloadSummary::default(),
            );
        }

        let total = urls.len();
        let mut images = Vec::new();
        let mut failed = 0;

        for (i, url) in urls.iter().enumerate() {
            debug!(url, "Processing URL {}/{}", i + 1, total);
            match self.fetch_one(url, images.len() + 1, state).await {
                Ok(filename) => {
                    info!(url, %filename, "Downloaded image");
                    state.record_download(filename.clone());
                    images.push(filename);
                }
                Err(e) => {
                    warn!(url, error = %e, "Image download failed");
                    failed += 1;
                }
            }
        }

        let succeeded = images.len();
        let status = ToolStatus::from_counts(succeeded, failed);
        let message = match status {
            ToolStatus::Success => format!("Successfully downloaded {} images", succeeded),
            ToolStatus::PartialSuccess => format!(
                "Successfully downloaded {} images. {} downloads failed",
                succeeded, failed
            ),
            ToolStatus::Error => format!(
                "Could not download any images. All {} downloads failed",
                failed
            ),
        };

        ToolReport::new(
            status,
            message,
            DownloadSummary {
                total_urls_processed: total,
                successful_downloads: succeeded,
                failed_downloads: failed,
                images,
            },
        )
    }

    async fn fetch_one(
        &self,
        raw: &str,
        sequence: usize,
        state: &SharedState,
    ) -> std::result::Result<String, FetchError> {
        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(FetchError::InvalidUrl(raw.to_string()));
        }
        let url = Url::parse(raw).map_err(|_| FetchError::InvalidUrl(raw.to_string()))?;
        let extension = extension_from_url(&url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(%status, "Response received");
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(FetchError::NotAnImage(content_type));
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Response body read");

        // Another session writing into the same directory may claim a name
        // between the check and the write
        let mut sequence = sequence;
        loop {
            let filename = self
                .store
                .unique_filename(Local::now(), sequence, extension, |name| state.contains(name))
                .await;
            match self.store.write_verified(&filename, &body).await {
                Ok(_) => return Ok(filename),
                Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!(%filename, "Filename claimed concurrently, retrying");
                    sequence += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Split on commas and newlines, trimming and dropping empty tokens
pub fn split_urls(input: &str) -> Vec<&str> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// File extension implied by the URL's last path segment
///
/// Falls back to `jpg` when the segment has no supported image extension.
pub fn extension_from_url(url: &Url) -> &'static str {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    segment
        .rsplit_once('.')
        .and_then(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .copied()
                .find(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(DEFAULT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(url: &str) -> &'static str {
        extension_from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_split_urls() {
        let urls = split_urls(" https://a/1.png ,\nhttps://b/2.jpg\n\n, ,https://c/3.gif");
        assert_eq!(urls, vec!["https://a/1.png", "https://b/2.jpg", "https://c/3.gif"]);
        assert!(split_urls("").is_empty());
        assert!(split_urls(" ,\n , ").is_empty());
    }

    #[test]
    fn test_extension_from_url() {
        assert_eq!(ext("https://x/a.png"), "png");
        assert_eq!(ext("https://x/a.JPEG"), "jpeg");
        assert_eq!(ext("https://x/photo.webp?w=200&h=100"), "webp");
        assert_eq!(ext("https://x/anim.gif#frag"), "gif");
        assert_eq!(ext("https://x/a.bmp"), "jpg");
        assert_eq!(ext("https://x/image"), "jpg");
        assert_eq!(ext("https://x/"), "jpg");
        assert_eq!(ext("https://x/dir.png/raw"), "jpg");
    }

    #[tokio::test]
    async fn test_invalid_scheme_counts_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DownloadManager::new(&ImageToolsConfig::new(dir.path())).unwrap();
        let mut state = SharedState::new();

        let report = manager
            .download("ftp://x/a.png\nnot-a-url", &mut state)
            .await;

        assert_eq!(report.status, ToolStatus::Error);
        assert_eq!(report.payload.total_urls_processed, 2);
        assert_eq!(report.payload.failed_downloads, 2);
        assert_eq!(
            report.message,
            "Could not download any images. All 2 downloads failed"
        );
        assert!(state.is_tracking());
        assert!(state.is_empty());
    }

    #[tokio::test]
    async fn test_no_urls_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DownloadManager::new(&ImageToolsConfig::new(dir.path())).unwrap();
        let mut state = SharedState::new();

        let report = manager.download(" , \n", &mut state).await;

        assert_eq!(report.status, ToolStatus::Success);
        assert_eq!(report.payload, DownloadSummary::default());
    }

    #[tokio::test]
    async fn test_url_list_is_not_resplit() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DownloadManager::new(&ImageToolsConfig::new(dir.path())).unwrap();
        let mut state = SharedState::new();

        let urls = vec!["ftp://h/a.png?size=1,2".to_string(), "  ".to_string()];
        let report = manager.download_urls(&urls, &mut state).await;

        assert_eq!(report.payload.total_urls_processed, 1);
        assert_eq!(report.payload.failed_downloads, 1);
    }

    #[tokio::test]
    async fn test_setup_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let manager = DownloadManager::new(&ImageToolsConfig::new(blocker.join("images"))).unwrap();
        let mut state = SharedState::new();
        let report = manager.download("https://x/a.png", &mut state).await;

        assert_eq!(report.status, ToolStatus::Error);
        assert!(report.message.starts_with("Error downloading images:"));
        assert_eq!(report.payload.total_urls_processed, 0);
        assert!(!state.is_tracking());
    }
}
