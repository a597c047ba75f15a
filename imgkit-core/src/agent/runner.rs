//! Runner - dispatches tool calls against session state
//!
//! One invocation locks its session's [`SharedState`], builds a
//! [`ToolContext`] and runs the tool. Calls for the same session are
//! serialized; calls for different sessions may run concurrently.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::agent::session::SessionService;
use crate::artifact::{ArtifactStore, InMemoryArtifactStore};
use crate::error::{Error, Result};
use crate::message::ToolCall;
use crate::report::{ToolReport, ToolStatus};
use crate::tool::{ToolContext, ToolSet};

/// Events emitted by the Runner during execution
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RunnerEvent {
    /// A tool is about to run
    ToolCall {
        /// Session the call belongs to
        session: String,
        /// Tool name
        tool: String,
        /// Raw JSON arguments
        input: String,
    },
    /// Tool execution finished
    ToolResult {
        /// Session the call belongs to
        session: String,
        /// Tool name
        tool: String,
        /// JSON output
        output: String,
    },
    /// Dispatch failed before the tool produced a report
    Error {
        /// Session the call belongs to
        session: String,
        /// Error message
        message: String,
    },
}

/// Output of one tool call in a batch
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToolOutput {
    /// ID of the originating call
    pub tool_call_id: String,
    /// Tool name
    pub name: String,
    /// JSON result handed back to the model
    pub content: String,
    /// Whether dispatch itself failed
    pub is_error: bool,
}

/// Executes tool calls for sessions
pub struct Runner {
    tools: ToolSet,
    sessions: Arc<SessionService>,
    artifacts: Arc<dyn ArtifactStore>,
    events: broadcast::Sender<RunnerEvent>,
}

impl Runner {
    /// Create a runner with in-memory sessions and artifacts
    pub fn new(tools: ToolSet) -> Self {
        Self::with_services(
            tools,
            Arc::new(SessionService::new()),
            Arc::new(InMemoryArtifactStore::new()),
        )
    }

    /// Create a runner around existing services
    pub fn with_services(
        tools: ToolSet,
        sessions: Arc<SessionService>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            tools,
            sessions,
            artifacts,
            events,
        }
    }

    /// Registered tools
    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Session service
    pub fn sessions(&self) -> &Arc<SessionService> {
        &self.sessions
    }

    /// Artifact store
    pub fn artifacts(&self) -> &Arc<dyn ArtifactStore> {
        &self.artifacts
    }

    /// Subscribe to runner events
    pub fn subscribe(&self) -> broadcast::Receiver<RunnerEvent> {
        self.events.subscribe()
    }

    /// Start a new session
    pub fn create_session(&self) -> String {
        self.sessions.create_session()
    }

    fn emit(&self, event: RunnerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Run one tool against a session's state
    ///
    /// Returns the tool's JSON report. Unknown sessions, unknown tools and
    /// unparsable arguments are errors; everything else is reported inside
    /// the JSON.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, session_id: &str, name: &str, arguments: &str) -> Result<String> {
        let handle = self.sessions.get(session_id)?;
        let mut state = handle.lock().await;

        self.emit(RunnerEvent::ToolCall {
            session: session_id.to_string(),
            tool: name.to_string(),
            input: arguments.to_string(),
        });

        let mut ctx = ToolContext::new(session_id, &mut state, self.artifacts.clone());
        match self.tools.call(name, &mut ctx, arguments).await {
            Ok(output) => {
                info!(tool = name, "Tool finished");
                self.emit(RunnerEvent::ToolResult {
                    session: session_id.to_string(),
                    tool: name.to_string(),
                    output: output.clone(),
                });
                Ok(output)
            }
            Err(e) => {
                error!(tool = name, error = %e, "Tool dispatch failed");
                self.emit(RunnerEvent::Error {
                    session: session_id.to_string(),
                    message: e.to_string(),
                });
                Err(match e.downcast::<Error>() {
                    Ok(err) => err,
                    Err(other) => Error::tool_execution(name, other.to_string()),
                })
            }
        }
    }

    /// Run a batch of model tool calls in order
    ///
    /// Dispatch failures become error reports so the conversation can go on.
    pub async fn run_tool_calls(&self, session_id: &str, calls: &[ToolCall]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            let arguments = call.arguments.to_string();
            let (content, is_error) = match self.call_tool(session_id, &call.name, &arguments).await {
                Ok(content) => (content, false),
                Err(e) => {
                    let report: ToolReport<()> =
                        ToolReport::new(ToolStatus::Error, e.to_string(), ());
                    let content = report
                        .to_json()
                        .unwrap_or_else(|_| r#"{"status":"error"}"#.to_string());
                    (content, true)
                }
            };
            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                name: call.name.clone(),
                content,
                is_error,
            });
        }
        outputs
    }
}
