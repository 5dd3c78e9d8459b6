use super::*;
use crate::error::Result;
use crate::tool::ToolInvocation;
use crate::tool::ToolResult;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use relay_protocol::ConfirmationRequest;
use relay_protocol::ToolKind;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct NamedTool {
    name: &'static str,
}

struct NamedInvocation {
    args: Value,
}

#[async_trait]
impl DeclarativeTool for NamedTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "test tool"
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Other
    }

    fn build(&self, args: Value) -> Result<Arc<dyn ToolInvocation>> {
        Ok(Arc::new(NamedInvocation { args }))
    }
}

#[async_trait]
impl ToolInvocation for NamedInvocation {
    fn args(&self) -> &Value {
        &self.args
    }

    fn description(&self) -> String {
        "test".to_string()
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
        Ok(ToolResult::text("ok"))
    }
}

#[test]
fn test_get_tool() {
    let mut registry = StaticToolRegistry::new();
    registry.register(Arc::new(NamedTool { name: "read_file" }));

    assert!(registry.get_tool("read_file").is_some());
    assert!(registry.get_tool("write_file").is_none());
}

#[test]
fn test_tool_names_in_registration_order() {
    let mut registry = StaticToolRegistry::new();
    registry.register(Arc::new(NamedTool { name: "write_file" }));
    registry.register(Arc::new(NamedTool { name: "read_file" }));
    registry.register(Arc::new(NamedTool { name: "grep" }));

    assert_eq!(registry.tool_names(), vec!["write_file", "read_file", "grep"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_re_registration_replaces_without_duplicating() {
    let mut registry = StaticToolRegistry::new();
    registry.register(Arc::new(NamedTool { name: "grep" }));
    registry.register(Arc::new(NamedTool { name: "grep" }));

    assert_eq!(registry.tool_names(), vec!["grep"]);
}

#[test]
fn test_empty_registry() {
    let registry = StaticToolRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.tool_names().is_empty());
}
