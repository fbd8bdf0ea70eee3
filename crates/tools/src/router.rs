//! Tool Router
//!
//! Decouples "what tool was asked for" from "what code handles it".
//! Dispatch validates the raw input, invokes the one registered handler,
//! and validates the handler's raw output before the caller sees it.
//! Errors propagate untouched; the router retries nothing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{HandlerError, ToolError};
use crate::schema::{validate_input, validate_output, ToolInput, ToolName, ToolOutput};

/// Default deadline for handler execution. Keeps a stalled scheduling
/// backend from blocking a live call indefinitely; see DESIGN.md.
const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 30;

/// Business logic behind one tool name.
///
/// Receives input already validated against the tool's contract and
/// returns a raw value the router validates on the way out, so a
/// misbehaving handler cannot leak a malformed response. Handlers must be
/// free of side effects on validation failure — they simply never run.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, input: ToolInput) -> Result<Value, HandlerError>;
}

/// Registry mapping tool name to handler.
///
/// Registration happens once at startup; after that the router is shared
/// read-only across calls and is stateless per request beyond the registry.
pub struct ToolRouter {
    handlers: HashMap<ToolName, Arc<dyn ToolHandler>>,
    dispatch_timeout: Duration,
}

impl ToolRouter {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            dispatch_timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS),
        }
    }

    /// Override the handler execution deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    /// Register a handler for `name`.
    ///
    /// At most one handler per name: a second registration is rejected with
    /// [`ToolError::DuplicateHandler`] and the original handler stays.
    pub fn register(
        &mut self,
        name: ToolName,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        if self.handlers.contains_key(&name) {
            return Err(ToolError::DuplicateHandler { tool: name });
        }
        self.handlers.insert(name, handler);
        tracing::debug!(tool = %name, "Registered tool handler");
        Ok(())
    }

    /// Whether a handler is registered for `name`.
    pub fn has(&self, name: ToolName) -> bool {
        self.handlers.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Names with a registered handler.
    pub fn registered_names(&self) -> Vec<ToolName> {
        self.handlers.keys().copied().collect()
    }

    /// Validate `raw_input`, invoke the handler for `name`, and validate
    /// its output.
    ///
    /// Input validation runs before the registration check, so malformed
    /// input surfaces as a contract error even for an unregistered tool.
    /// The only side effects are the invoked handler's own.
    pub async fn dispatch(&self, name: &str, raw_input: &Value) -> Result<ToolOutput, ToolError> {
        let tool: ToolName = name.parse()?;
        let input = validate_input(tool, raw_input)?;

        let handler = self
            .handlers
            .get(&tool)
            .ok_or(ToolError::Unregistered { tool })?;

        tracing::trace!(tool = %tool, "Dispatching tool");

        let raw_output = match tokio::time::timeout(self.dispatch_timeout, handler.call(input)).await
        {
            Ok(result) => result.map_err(|source| ToolError::Handler { tool, source })?,
            Err(_elapsed) => {
                return Err(ToolError::Timeout {
                    tool,
                    timeout_secs: self.dispatch_timeout.as_secs(),
                })
            }
        };

        validate_output(tool, &raw_output)
    }
}

impl Default for ToolRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoCancellation;

    #[async_trait]
    impl ToolHandler for EchoCancellation {
        async fn call(&self, _input: ToolInput) -> Result<Value, HandlerError> {
            Ok(json!({"status": "cancelled"}))
        }
    }

    struct BrokenCancellation;

    #[async_trait]
    impl ToolHandler for BrokenCancellation {
        async fn call(&self, _input: ToolInput) -> Result<Value, HandlerError> {
            Ok(json!({"status": "done"}))
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn call(&self, _input: ToolInput) -> Result<Value, HandlerError> {
            Err(HandlerError::new("backend unavailable"))
        }
    }

    struct SlowHandler;

    #[async_trait]
    impl ToolHandler for SlowHandler {
        async fn call(&self, _input: ToolInput) -> Result<Value, HandlerError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(json!({"status": "cancelled"}))
        }
    }

    fn cancel_input() -> Value {
        json!({"name": "Ahmed Khan", "slot_start": "2026-09-01T10:00:00Z", "reason": null})
    }

    #[tokio::test]
    async fn dispatch_runs_handler_and_validates_output() {
        let mut router = ToolRouter::new();
        router
            .register(ToolName::CancelAppointment, Arc::new(EchoCancellation))
            .unwrap();

        let output = router
            .dispatch("cancel_appointment", &cancel_input())
            .await
            .unwrap();
        assert!(matches!(output, ToolOutput::CancelAppointment(_)));
    }

    #[tokio::test]
    async fn unregistered_tool_fails_after_input_validation() {
        let router = ToolRouter::new();

        // Valid input for an unregistered tool: validation passes first,
        // then registration lookup fails.
        let err = router
            .dispatch("cancel_appointment", &cancel_input())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::Unregistered { tool: ToolName::CancelAppointment }
        ));

        // Malformed input reports the contract error, not the missing handler.
        let err = router
            .dispatch("cancel_appointment", &json!({"name": "Ahmed Khan"}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::InvalidInput { field, .. } if field == "slot_start"
        ));
    }

    #[tokio::test]
    async fn unknown_tool_name_is_a_hard_error() {
        let router = ToolRouter::new();
        let err = router.dispatch("summon_wizard", &json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { name } if name == "summon_wizard"));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let mut router = ToolRouter::new();
        router
            .register(ToolName::CancelAppointment, Arc::new(EchoCancellation))
            .unwrap();
        let err = router
            .register(ToolName::CancelAppointment, Arc::new(BrokenCancellation))
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::DuplicateHandler { tool: ToolName::CancelAppointment }
        ));

        // Original handler still answers.
        let output = router
            .dispatch("cancel_appointment", &cancel_input())
            .await
            .unwrap();
        assert!(matches!(output, ToolOutput::CancelAppointment(_)));
    }

    #[tokio::test]
    async fn output_contract_breach_is_caught_before_the_caller() {
        let mut router = ToolRouter::new();
        router
            .register(ToolName::CancelAppointment, Arc::new(BrokenCancellation))
            .unwrap();

        let err = router
            .dispatch("cancel_appointment", &cancel_input())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::InvalidOutput { field, .. } if field == "status"
        ));
    }

    #[tokio::test]
    async fn handler_failure_propagates_unchanged() {
        let mut router = ToolRouter::new();
        router
            .register(ToolName::CancelAppointment, Arc::new(FailingHandler))
            .unwrap();

        let err = router
            .dispatch("cancel_appointment", &cancel_input())
            .await
            .unwrap_err();
        match err {
            ToolError::Handler { source, .. } => {
                assert_eq!(source.message, "backend unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn slow_handler_hits_the_dispatch_deadline() {
        let mut router = ToolRouter::new().with_timeout(Duration::from_millis(10));
        router
            .register(ToolName::CancelAppointment, Arc::new(SlowHandler))
            .unwrap();

        let err = router
            .dispatch("cancel_appointment", &cancel_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
    }
}
