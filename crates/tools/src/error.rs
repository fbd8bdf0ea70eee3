//! Tool error taxonomy
//!
//! Every variant propagates to whoever invoked dispatch; the router never
//! retries and never swallows. User-visible recovery (apologize, re-prompt)
//! belongs to the caller of this layer.

use thiserror::Error;

use crate::schema::ToolName;

/// Failure from a tool handler's own business logic, propagated unchanged
/// through the router.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors surfaced by the contract layer and the router.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Raw data for a tool input failed its contract. Names the first
    /// offending field.
    #[error("invalid input for {tool}: field `{field}`")]
    InvalidInput { tool: ToolName, field: String },

    /// A handler result failed the tool's output contract. Names the first
    /// offending field, so a misbehaving handler cannot leak malformed data
    /// past the boundary.
    #[error("invalid output from {tool}: field `{field}`")]
    InvalidOutput { tool: ToolName, field: String },

    /// Dispatch was requested for a name outside the tool set.
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    /// Dispatch was requested for a tool with no registered handler.
    /// Fatal for that request, never silently ignored.
    #[error("no handler registered for tool: {tool}")]
    Unregistered { tool: ToolName },

    /// A handler is registered for at most one tool name; re-registering
    /// is rejected and the original handler stays in place.
    #[error("handler already registered for tool: {tool}")]
    DuplicateHandler { tool: ToolName },

    /// Handler exceeded the dispatch deadline.
    #[error("tool {tool} timed out after {timeout_secs}s")]
    Timeout { tool: ToolName, timeout_secs: u64 },

    /// Handler failure, passed through without wrapping or retry.
    #[error("tool {tool} failed: {source}")]
    Handler {
        tool: ToolName,
        #[source]
        source: HandlerError,
    },
}
