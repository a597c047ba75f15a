//! Tool system for AI agents
//!
//! Provides the core abstraction for defining tools that AI agents can call.
//! Tools receive a [`ToolContext`] carrying the session's shared state and the
//! artifact store, plus their arguments as a JSON string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::artifact::ArtifactStore;
use crate::error::Error;
use crate::state::SharedState;

pub mod images;

pub use images::{
    image_tools, DisplayImagesTool, LoadArtifactsTool, SaveImageArtifactTool, ScrapeImagesTool,
};

/// Definition of a tool that can be sent to the LLM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,
    /// Description for the LLM
    pub description: String,
    /// JSON Schema for parameters
    pub parameters: serde_json::Value,
    /// TypeScript interface definition (Preferred for System Prompt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_ts: Option<String>,
}

/// Per-invocation context handed to a tool
pub struct ToolContext<'a> {
    session_id: &'a str,
    state: &'a mut SharedState,
    artifacts: Arc<dyn ArtifactStore>,
}

impl<'a> ToolContext<'a> {
    /// Create a context for one invocation
    pub fn new(
        session_id: &'a str,
        state: &'a mut SharedState,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            session_id,
            state,
            artifacts,
        }
    }

    /// Session the invocation belongs to
    pub fn session_id(&self) -> &str {
        self.session_id
    }

    /// Shared state (read)
    pub fn state(&self) -> &SharedState {
        &*self.state
    }

    /// Shared state (write)
    pub fn state_mut(&mut self) -> &mut SharedState {
        &mut *self.state
    }

    /// Artifact store capability
    pub fn artifacts(&self) -> &dyn ArtifactStore {
        self.artifacts.as_ref()
    }

    /// Split borrow: mutable state plus the artifact store
    pub fn state_and_artifacts(&mut self) -> (&mut SharedState, &dyn ArtifactStore) {
        (&mut *self.state, self.artifacts.as_ref())
    }
}

/// Trait for implementing tools that AI agents can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of this tool
    fn name(&self) -> String;

    /// Get the tool definition for the LLM
    async fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments (JSON string)
    async fn call(&self, ctx: &mut ToolContext<'_>, arguments: &str) -> anyhow::Result<String>;
}

/// A collection of tools available to an agent
#[derive(Clone)]
pub struct ToolSet {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Cached definitions to avoid async calls during prompt generation
    cached_definitions: Arc<parking_lot::RwLock<HashMap<String, ToolDefinition>>>,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolSet {
    /// Create an empty toolset
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            cached_definitions: Arc::new(parking_lot::RwLock::new(HashMap::new())),
        }
    }

    /// Add a tool to the set
    pub fn add<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.add_shared(Arc::new(tool))
    }

    /// Add a shared tool to the set
    pub fn add_shared(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        let name = tool.name();
        self.cached_definitions.write().remove(&name);
        self.tools.insert(name, tool);
        self
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool definitions, sorted by name
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();

        let mut defs = Vec::with_capacity(names.len());
        for name in names {
            // Check cache in a small block to ensure guard is dropped
            let cached = { self.cached_definitions.read().get(name).cloned() };

            if let Some(def) = cached {
                defs.push(def);
            } else if let Some(tool) = self.tools.get(name) {
                let def = tool.definition().await;
                self.cached_definitions
                    .write()
                    .insert(name.clone(), def.clone());
                defs.push(def);
            }
        }
        defs
    }

    /// Call a tool by name
    pub async fn call(
        &self,
        name: &str,
        ctx: &mut ToolContext<'_>,
        arguments: &str,
    ) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        tool.call(ctx, arguments).await
    }

    /// Get the number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Builder for creating a ToolSet
pub struct ToolSetBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl Default for ToolSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolSetBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Build the ToolSet
    pub fn build(self) -> ToolSet {
        let mut toolset = ToolSet::new();
        for tool in self.tools {
            toolset.add_shared(tool);
        }
        toolset
    }
}

/// Parse JSON tool arguments, mapping failures to [`Error::ToolArguments`]
pub fn parse_arguments<T: for<'de> Deserialize<'de>>(
    tool_name: &str,
    arguments: &str,
) -> crate::error::Result<T> {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(arguments).map_err(|e| Error::tool_arguments(tool_name, e.to_string()))
}
