//! Error types for the imgkit tools

use thiserror::Error;

/// Result type alias using imgkit's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the imgkit tools
#[derive(Debug, Error)]
pub enum Error {
    // ============ Configuration Errors ============
    /// Tool configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    // ============ Tool Errors ============
    /// Tool not found in the toolset
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution failed
    #[error("Tool execution error: {tool_name} - {message}")]
    ToolExecution {
        /// Name of the tool that failed
        tool_name: String,
        /// Error message
        message: String,
    },

    /// Invalid tool arguments
    #[error("Invalid tool arguments for {tool_name}: {message}")]
    ToolArguments {
        /// Name of the tool
        tool_name: String,
        /// Error message
        message: String,
    },

    // ============ Image Store Errors ============
    /// Filename cannot name a file inside the image store
    #[error("Invalid image filename: {0}")]
    InvalidFilename(String),

    /// Image file is not present in the store
    #[error("Image file not found: {0}")]
    ImageNotFound(String),

    /// Image was written but failed verification
    #[error("Failed to save image: {0}")]
    ImageVerification(String),

    // ============ Artifact Errors ============
    /// Artifact store rejected or failed an operation
    #[error("Artifact store error: {0}")]
    ArtifactStore(String),

    // ============ Session Errors ============
    /// Session does not exist
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // ============ Serialization Errors ============
    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    // ============ Network Errors ============
    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ============ System Errors ============
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============ Generic Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new tool execution error
    pub fn tool_execution(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a new tool arguments error
    pub fn tool_arguments(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolArguments {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a new artifact store error
    pub fn artifact_store(msg: impl Into<String>) -> Self {
        Self::ArtifactStore(msg.into())
    }
}
