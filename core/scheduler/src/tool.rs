//! Tool and invocation traits.
//!
//! A [`DeclarativeTool`] is the registered, stateless description of a
//! capability; building it with a concrete set of arguments yields a
//! [`ToolInvocation`], the per-call object the scheduler validates,
//! confirms, and executes.

use std::sync::Arc;

use async_trait::async_trait;
use relay_protocol::ConfirmationRequest;
use relay_protocol::LlmContent;
use relay_protocol::ResultDisplay;
use relay_protocol::ToolKind;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Names under which a shell tool may appear in allowlist patterns.
pub const SHELL_TOOL_NAMES: &[&str] = &["run_shell_command", "ShellTool", "shell"];

/// Result of executing a tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolResult {
    /// Content destined for the model.
    pub llm_content: LlmContent,
    /// Human-renderable outcome, when the tool has one.
    pub return_display: Option<ResultDisplay>,
}

impl ToolResult {
    /// Create a text-only result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            llm_content: LlmContent::Text(content.into()),
            return_display: None,
        }
    }

    /// Attach a renderable display.
    pub fn with_display(mut self, display: ResultDisplay) -> Self {
        self.return_display = Some(display);
        self
    }
}

/// A registered tool the scheduler can resolve by name.
#[async_trait]
pub trait DeclarativeTool: Send + Sync {
    /// Registry name of the tool.
    fn name(&self) -> &str;

    /// Human-facing name.
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Short description.
    fn description(&self) -> &str;

    /// Broad classification of what the tool does.
    fn kind(&self) -> ToolKind;

    /// Additional names under which allowlist patterns may refer to
    /// this tool (class names, MCP server names, synonyms).
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the tool emits incremental output while executing.
    fn streams_output(&self) -> bool {
        false
    }

    /// Build a per-call invocation from request arguments.
    ///
    /// Returns an error when the arguments fail validation; the
    /// scheduler surfaces it as a terminal `error` state.
    fn build(&self, args: Value) -> Result<Arc<dyn ToolInvocation>>;
}

/// A single prepared call of a tool with concrete arguments.
#[async_trait]
pub trait ToolInvocation: Send + Sync {
    /// The arguments this invocation was built from.
    fn args(&self) -> &Value;

    /// One-line description of what this call will do.
    fn description(&self) -> String;

    /// Ask whether this call needs user confirmation.
    ///
    /// Returns `None` when the call may run without asking. The token
    /// must be observed across any suspension (a thrown error with the
    /// token fired is treated as cancellation, not failure).
    async fn should_confirm_execute(
        &self,
        token: &CancellationToken,
    ) -> Result<Option<ConfirmationRequest>>;

    /// Execute the call.
    ///
    /// `live_output` is provided for tools that stream incremental
    /// output (see [`DeclarativeTool::streams_output`]).
    async fn execute(
        &self,
        token: &CancellationToken,
        live_output: Option<mpsc::UnboundedSender<String>>,
    ) -> Result<ToolResult>;

    /// For modifiable tools: rebuild request arguments around
    /// user-revised proposed content.
    ///
    /// Returns `None` when the tool does not support modification.
    fn updated_args_for(&self, _modified_content: &str) -> Option<Value> {
        None
    }
}

/// The shell `command` argument of an invocation, when it has one.
pub fn command_argument(invocation: &dyn ToolInvocation) -> Option<&str> {
    invocation.args().get("command").and_then(|v| v.as_str())
}

/// Check whether a tool is shell-like (subject to per-sub-command
/// allowlist checks).
pub fn is_shell_like(tool: &dyn DeclarativeTool) -> bool {
    tool.kind() == ToolKind::Execute || SHELL_TOOL_NAMES.contains(&tool.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    struct EchoInvocation {
        args: Value,
    }

    #[async_trait]
    impl DeclarativeTool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the message back"
        }

        fn kind(&self) -> ToolKind {
            ToolKind::Other
        }

        fn build(&self, args: Value) -> Result<Arc<dyn ToolInvocation>> {
            Ok(Arc::new(EchoInvocation { args }))
        }
    }

    #[async_trait]
    impl ToolInvocation for EchoInvocation {
        fn args(&self) -> &Value {
            &self.args
        }

        fn description(&self) -> String {
            "echo".to_string()
        }

        async fn should_confirm_execute(
            &self,
            _token: &CancellationToken,
        ) -> Result<Option<ConfirmationRequest>> {
            Ok(None)
        }

        async fn execute(
            &self,
            _token: &CancellationToken,
            _live_output: Option<mpsc::UnboundedSender<String>>,
        ) -> Result<ToolResult> {
            Ok(ToolResult::text(
                self.args["message"].as_str().unwrap_or_default(),
            ))
        }
    }

    #[tokio::test]
    async fn test_build_and_execute() {
        let tool = EchoTool;
        let invocation = tool
            .build(serde_json::json!({"message": "hi"}))
            .expect("valid args");
        let result = invocation
            .execute(&CancellationToken::new(), None)
            .await
            .expect("execute");
        assert!(matches!(result.llm_content, LlmContent::Text(ref t) if t == "hi"));
    }

    #[test]
    fn test_command_argument() {
        let tool = EchoTool;
        let invocation = tool
            .build(serde_json::json!({"command": "ls -la"}))
            .unwrap();
        assert_eq!(command_argument(invocation.as_ref()), Some("ls -la"));

        let none = tool.build(serde_json::json!({})).unwrap();
        assert_eq!(command_argument(none.as_ref()), None);
    }
}
