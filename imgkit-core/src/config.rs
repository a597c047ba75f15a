//! Configuration for the image tools
//!
//! Values come from [`Default`], the environment ([`ImageToolsConfig::from_env`])
//! or a YAML file ([`ImageToolsConfig::from_yaml_file`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default directory for downloaded images, relative to the working directory
pub const DEFAULT_IMAGE_DIR: &str = "reference_images";

/// Default per-request HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Browser-like user agent; some image hosts refuse unknown clients
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Configuration shared by the download, publish and display tools
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageToolsConfig {
    /// Directory holding downloaded images
    pub image_dir: PathBuf,
    /// Timeout for each image request
    pub http_timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ImageToolsConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ImageToolsConfig {
    /// Create a config storing images in `image_dir`
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            ..Self::default()
        }
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// HTTP timeout as a [`Duration`]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Build a config from `IMGKIT_*` environment variables, falling back to defaults
    ///
    /// - `IMGKIT_IMAGE_DIR`
    /// - `IMGKIT_HTTP_TIMEOUT_SECS`
    /// - `IMGKIT_USER_AGENT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("IMGKIT_IMAGE_DIR") {
            config.image_dir = PathBuf::from(dir);
        }
        if let Ok(secs) = std::env::var("IMGKIT_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = secs.trim().parse().map_err(|_| {
                Error::config(format!("IMGKIT_HTTP_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        if let Ok(agent) = std::env::var("IMGKIT_USER_AGENT") {
            config.user_agent = agent;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub async fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml_str(&content)
    }

    /// Reject configurations the tools cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.image_dir.as_os_str().is_empty() {
            return Err(Error::config("image_dir must not be empty"));
        }
        if self.http_timeout_secs == 0 {
            return Err(Error::config("http_timeout_secs must be greater than zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::config("user_agent must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImageToolsConfig::default();
        assert_eq!(config.image_dir, PathBuf::from("reference_images"));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = ImageToolsConfig::from_yaml_str("image_dir: /tmp/pics\nhttp_timeout_secs: 5\n")
            .unwrap();
        assert_eq!(config.image_dir, PathBuf::from("/tmp/pics"));
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_yaml_rejects_zero_timeout() {
        let err = ImageToolsConfig::from_yaml_str("http_timeout_secs: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder_setters() {
        let config = ImageToolsConfig::new("pics")
            .with_timeout(Duration::from_millis(200))
            .with_user_agent("imgkit-test");
        assert_eq!(config.http_timeout_secs, 1);
        assert_eq!(config.user_agent, "imgkit-test");
    }
}
