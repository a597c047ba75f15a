//! Local image store
//!
//! A flat directory of downloaded images. Files are written once and never
//! mutated afterwards; names are the identity the rest of the tools share.

use bytes::Bytes;
use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

/// Extensions accepted for downloaded images
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Extension used when the URL does not carry a known one
pub const DEFAULT_EXTENSION: &str = "jpg";

/// MIME type for files with an unknown extension
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A directory of downloaded images
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    /// Open a store rooted at `root`; the directory is created lazily
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolve `filename` inside the store
    ///
    /// Names with separators or parent components cannot live in the flat
    /// store and are rejected.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !filename.contains(['/', '\\']) => {
                Ok(self.root.join(filename))
            }
            _ => Err(Error::InvalidFilename(filename.to_string())),
        }
    }

    /// Whether `filename` exists as a regular file
    pub async fn exists(&self, filename: &str) -> bool {
        match self.path_for(filename) {
            Ok(path) => fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Read the raw bytes of a stored image
    pub async fn read(&self, filename: &str) -> Result<Bytes> {
        let path = self.path_for(filename)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::ImageNotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write `data` as `filename` and verify it landed with a nonzero size
    ///
    /// Never overwrites: an existing `filename` fails with
    /// [`std::io::ErrorKind::AlreadyExists`]. A file that fails verification
    /// is removed again, as is one whose write failed partway.
    pub async fn write_verified(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(filename)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_discard(&mut file, &path, data).await?;
        drop(file);

        let size = fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            fs::remove_file(&path).await.ok();
            return Err(Error::ImageVerification(filename.to_string()));
        }

        tracing::debug!(path = %path.display(), size, "Image written");
        Ok(path)
    }

    /// Pick a name `downloaded_image_<YYYYMMDD-HHMMSS>_<n>.<ext>` not yet on disk
    ///
    /// `n` starts at `sequence` and advances past names already taken on disk
    /// or rejected by `is_taken`.
    pub async fn unique_filename(
        &self,
        timestamp: DateTime<Local>,
        sequence: usize,
        extension: &str,
        is_taken: impl Fn(&str) -> bool,
    ) -> String {
        let stamp = timestamp.format("%Y%m%d-%H%M%S");
        let mut n = sequence.max(1);
        loop {
            let candidate = format!("downloaded_image_{}_{}.{}", stamp, n, extension);
            if !is_taken(&candidate) && !self.exists(&candidate).await {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Write and flush `data`, removing `path` if either step fails
async fn write_or_discard<W>(writer: &mut W, path: &Path, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let result = match writer.write_all(data).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::warn!(path = %path.display(), error = %e, "Image write failed, removing partial file");
        fs::remove_file(path).await.ok();
        return Err(e);
    }
    Ok(())
}

/// Extension of `filename`, lowercased
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Whether `ext` (lowercase) is a supported image extension
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// MIME type for an image filename
pub fn mime_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => FALLBACK_MIME_TYPE,
    }
}
