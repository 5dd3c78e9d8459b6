use super::*;
use crate::error::Result;
use crate::tool::ToolResult;
use async_trait::async_trait;
use relay_protocol::ConfirmationRequest;
use relay_protocol::ToolKind;
use serde_json::json;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct TestTool {
    name: &'static str,
    kind: ToolKind,
    aliases: Vec<String>,
}

struct TestInvocation {
    args: Value,
}

#[async_trait]
impl DeclarativeTool for TestTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "test tool"
    }

    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn aliases(&self) -> Vec<String> {
        self.aliases.clone()
    }

    fn build(&self, args: Value) -> Result<Arc<dyn ToolInvocation>> {
        Ok(Arc::new(TestInvocation { args }))
    }
}

#[async_trait]
impl ToolInvocation for TestInvocation {
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

fn shell_tool() -> TestTool {
    TestTool {
        name: "run_shell_command",
        kind: ToolKind::Execute,
        aliases: vec![],
    }
}

fn patterns(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn matches(tool: &TestTool, args: Value, pats: &[&str]) -> bool {
    let invocation = tool.build(args).unwrap();
    does_invocation_match(tool, invocation.as_ref(), &patterns(pats))
}

#[test]
fn test_bare_tool_name_matches_any_invocation() {
    let tool = TestTool {
        name: "read_file",
        kind: ToolKind::Read,
        aliases: vec![],
    };
    assert!(matches(&tool, json!({"path": "/a"}), &["read_file"]));
    assert!(!matches(&tool, json!({"path": "/a"}), &["write_file"]));
}

#[test]
fn test_exact_command_matches() {
    let tool = shell_tool();
    assert!(matches(
        &tool,
        json!({"command": "echo foo"}),
        &["run_shell_command(echo foo)"]
    ));
}

#[test]
fn test_prefix_requires_word_boundary() {
    let tool = shell_tool();
    assert!(matches(
        &tool,
        json!({"command": "echo foo bar"}),
        &["run_shell_command(echo foo)"]
    ));
    assert!(!matches(
        &tool,
        json!({"command": "echo foobar"}),
        &["run_shell_command(echo foo)"]
    ));
}

#[test]
fn test_piped_suffix_does_not_escalate() {
    // The piped-suffix escalation bug: a permitted prefix must not
    // approve the rest of the pipeline.
    let tool = shell_tool();
    assert!(!matches(
        &tool,
        json!({"command": r#"echo foo | echo "evil""#}),
        &["run_shell_command(echo foo)"]
    ));
}

#[test]
fn test_chained_command_requires_every_sub_command() {
    let tool = shell_tool();
    let pats = &[
        "run_shell_command(echo foo)",
        "run_shell_command(echo bar)",
    ];
    assert!(matches(&tool, json!({"command": "echo foo && echo bar"}), pats));
    assert!(!matches(
        &tool,
        json!({"command": "echo foo && echo baz"}),
        pats
    ));
}

#[test]
fn test_bare_shell_pattern_matches_all_sub_commands() {
    let tool = shell_tool();
    assert!(matches(
        &tool,
        json!({"command": "echo a | grep b; ls"}),
        &["run_shell_command"]
    ));
}

#[test]
fn test_shell_synonyms_match() {
    let tool = shell_tool();
    assert!(matches(
        &tool,
        json!({"command": "echo foo"}),
        &["ShellTool(echo foo)"]
    ));
    assert!(matches(
        &tool,
        json!({"command": "echo foo"}),
        &["shell(echo foo)"]
    ));
}

#[test]
fn test_aliases_match() {
    let tool = TestTool {
        name: "github.list_files",
        kind: ToolKind::Communicate,
        aliases: vec!["github".to_string()],
    };
    assert!(matches(&tool, json!({}), &["github"]));
    assert!(matches(&tool, json!({}), &["github.list_files"]));
    assert!(!matches(&tool, json!({}), &["gitlab"]));
}

#[test]
fn test_unterminated_paren_never_matches() {
    let tool = shell_tool();
    assert!(!matches(
        &tool,
        json!({"command": "echo foo"}),
        &["run_shell_command(echo foo"]
    ));
}

#[test]
fn test_empty_patterns_never_match() {
    let tool = shell_tool();
    assert!(!matches(&tool, json!({"command": "echo foo"}), &[]));
}

#[test]
fn test_empty_command_never_matches() {
    let tool = shell_tool();
    assert!(!matches(&tool, json!({"command": "  "}), &["run_shell_command"]));
}

#[test]
fn test_quoted_separator_is_one_sub_command() {
    let tool = shell_tool();
    assert!(matches(
        &tool,
        json!({"command": "echo 'foo | bar'"}),
        &["run_shell_command(echo 'foo | bar')"]
    ));
}

#[test]
fn test_arg_prefix_pattern_ignores_non_shell_tools() {
    let tool = TestTool {
        name: "read_file",
        kind: ToolKind::Read,
        aliases: vec![],
    };
    // An arg-prefix pattern needs a command argument to compare with.
    assert!(!matches(&tool, json!({"path": "/a"}), &["read_file(/a)"]));
}
