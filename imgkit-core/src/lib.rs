//! # imgkit Core - image tools for conversational agents
//!
//! Core types, traits, and components behind a small set of agent tools that
//! download images from the web, publish them as versioned artifacts and
//! report what is available in a session.
//!
//! This crate provides:
//! - Image components (`images`) - Download, publish and display reporting
//! - Tool definitions (`tool`) - The tool trait and the image tool set
//! - Session state (`state`) - Per-session image tracking
//! - Artifacts (`artifact`) - Versioned artifact storage
//! - Local storage (`store`) - The on-disk image directory
//! - Dispatch (`agent`) - Sessions and the tool runner

#![warn(missing_docs)]

pub mod agent;
pub mod artifact;
pub mod config;
pub mod display;
pub mod error;
pub mod images;
pub mod logging;
pub mod message;
pub mod report;
pub mod state;
pub mod store;
pub mod tool;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::agent::{Runner, RunnerEvent, SessionService};
    pub use crate::artifact::{Artifact, ArtifactStore, InMemoryArtifactStore};
    pub use crate::config::ImageToolsConfig;
    pub use crate::display::{ImageDisplay, NoDisplay, TracingDisplay};
    pub use crate::error::{Error, Result};
    pub use crate::images::{ArtifactPublisher, DisplayReporter, DownloadManager};
    pub use crate::message::{ContentPart, ToolCall};
    pub use crate::report::{ToolReport, ToolStatus};
    pub use crate::state::{ImageStatus, SharedState};
    pub use crate::store::LocalImageStore;
    pub use crate::tool::{image_tools, Tool, ToolContext, ToolDefinition, ToolSet};
}
