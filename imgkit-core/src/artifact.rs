//! Artifact store capability
//!
//! Artifacts are named, typed binary objects held outside the local image
//! directory. The tools only rely on [`ArtifactStore::save`]; loading and
//! listing back the `load_artifacts` tool.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A saved artifact version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Artifact name (the image filename)
    pub name: String,
    /// Version number, starting at 0
    pub version: u32,
    /// MIME type of `data`
    pub mime_type: String,
    /// Raw content
    pub data: Bytes,
    /// When this version was saved
    pub saved_at: DateTime<Utc>,
}

/// Confirmation returned by [`ArtifactStore::save`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReceipt {
    /// Artifact name
    pub name: String,
    /// Version assigned to the saved content
    pub version: u32,
}

/// External store for artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Save `data` under `name`, returning the new version
    async fn save(&self, name: &str, data: Bytes, mime_type: &str) -> Result<ArtifactReceipt>;

    /// Load a version of `name` (latest when `version` is `None`)
    async fn load(&self, name: &str, version: Option<u32>) -> Result<Option<Artifact>>;

    /// Names of all stored artifacts, sorted
    async fn list(&self) -> Result<Vec<String>>;
}

/// Process-local artifact store keeping every version in memory
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    artifacts: DashMap<String, Vec<Artifact>>,
}

impl InMemoryArtifactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions stored for `name`
    pub fn version_count(&self, name: &str) -> usize {
        self.artifacts.get(name).map_or(0, |v| v.len())
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn save(&self, name: &str, data: Bytes, mime_type: &str) -> Result<ArtifactReceipt> {
        if name.is_empty() {
            return Err(Error::artifact_store("artifact name must not be empty"));
        }

        let mut versions = self.artifacts.entry(name.to_string()).or_default();
        let version = u32::try_from(versions.len())
            .map_err(|_| Error::artifact_store(format!("too many versions of {}", name)))?;

        versions.push(Artifact {
            name: name.to_string(),
            version,
            mime_type: mime_type.to_string(),
            data,
            saved_at: Utc::now(),
        });

        tracing::debug!(artifact = name, version, mime_type, "Artifact saved");
        Ok(ArtifactReceipt {
            name: name.to_string(),
            version,
        })
    }

    async fn load(&self, name: &str, version: Option<u32>) -> Result<Option<Artifact>> {
        let Some(versions) = self.artifacts.get(name) else {
            return Ok(None);
        };
        let artifact = match version {
            Some(v) => versions.iter().find(|a| a.version == v),
            None => versions.last(),
        };
        Ok(artifact.cloned())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.artifacts.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }
}
