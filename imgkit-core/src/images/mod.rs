//! The image tool components
//!
//! - [`DownloadManager`]: URLs -> local image store + shared state
//! - [`ArtifactPublisher`]: local image -> artifact store + shared state
//! - [`DisplayReporter`]: shared state vs. local image store

pub mod download;
pub mod publish;
pub mod reporter;

pub use download::{extension_from_url, split_urls, DownloadManager, FetchError};
pub use publish::ArtifactPublisher;
pub use reporter::DisplayReporter;
