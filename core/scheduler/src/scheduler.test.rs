use super::*;
use crate::config::SessionPolicy;
use crate::editor::EditorBridge;
use crate::error::Result;
use crate::registry::StaticToolRegistry;
use crate::tool::ToolResult;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use relay_protocol::ConfirmationPayload;
use relay_protocol::ConfirmationRequest;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

// ── Mock tools ───────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
enum ConfirmBehavior {
    /// Runs without asking.
    Never,
    /// Asks with an exec confirmation built from the `command` arg.
    Exec,
    /// Asks with an edit confirmation built from the `content` arg.
    Edit,
    /// Asks with an info confirmation.
    Info,
}

struct MockTool {
    name: String,
    kind: ToolKind,
    confirm: ConfirmBehavior,
    executed: Arc<AtomicUsize>,
    wait_for_cancel: bool,
    delay: Option<Duration>,
    streams: bool,
}

impl MockTool {
    fn new(name: &str, kind: ToolKind, confirm: ConfirmBehavior) -> Self {
        Self {
            name: name.to_string(),
            kind,
            confirm,
            executed: Arc::new(AtomicUsize::new(0)),
            wait_for_cancel: false,
            delay: None,
            streams: false,
        }
    }

    fn shell() -> Self {
        Self::new("run_shell_command", ToolKind::Execute, ConfirmBehavior::Exec)
    }

    fn edit() -> Self {
        Self::new("edit_file", ToolKind::Edit, ConfirmBehavior::Edit)
    }

    fn executed(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.executed)
    }
}

struct MockInvocation {
    args: Value,
    confirm: ConfirmBehavior,
    executed: Arc<AtomicUsize>,
    wait_for_cancel: bool,
    delay: Option<Duration>,
    streams: bool,
}

#[async_trait]
impl DeclarativeTool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "mock tool"
    }

    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn streams_output(&self) -> bool {
        self.streams
    }

    fn build(&self, args: Value) -> Result<Arc<dyn ToolInvocation>> {
        if args.get("invalid").is_some() {
            return Err(scheduler_error::InvalidParamsSnafu {
                tool_name: self.name.clone(),
                message: "the `invalid` argument is not accepted".to_string(),
            }
            .build());
        }
        Ok(Arc::new(MockInvocation {
            args,
            confirm: self.confirm,
            executed: Arc::clone(&self.executed),
            wait_for_cancel: self.wait_for_cancel,
            delay: self.delay,
            streams: self.streams,
        }))
    }
}

#[async_trait]
impl ToolInvocation for MockInvocation {
    fn args(&self) -> &Value {
        &self.args
    }

    fn description(&self) -> String {
        "mock invocation".to_string()
    }

    async fn should_confirm_execute(
        &self,
        _token: &CancellationToken,
    ) -> Result<Option<ConfirmationRequest>> {
        let request = match self.confirm {
            ConfirmBehavior::Never => return Ok(None),
            ConfirmBehavior::Exec => {
                let command = self.args["command"].as_str().unwrap_or_default().to_string();
                let root_command = relay_shell_parser::command_prefix(
                    &command,
                    &["git", "gh", "gh run", "echo"],
                );
                ConfirmationRequest::new(
                    "Run shell command",
                    ConfirmationKind::Exec {
                        command,
                        root_command,
                    },
                )
            }
            ConfirmBehavior::Edit => {
                let new_content = self.args["content"].as_str().unwrap_or("new").to_string();
                ConfirmationRequest::new(
                    "Apply edit",
                    ConfirmationKind::Edit {
                        file_name: "a.txt".to_string(),
                        file_path: "/work/a.txt".into(),
                        file_diff: format!("--- a.txt\n+++ a.txt\n-old\n+{new_content}\n"),
                        original_content: "old".to_string(),
                        new_content,
                        is_modifying: None,
                    },
                )
            }
            ConfirmBehavior::Info => ConfirmationRequest::new(
                "Fetch content",
                ConfirmationKind::Info {
                    prompt: "Fetch https://example.com?".to_string(),
                    urls: Some(vec!["https://example.com".to_string()]),
                },
            ),
        };
        Ok(Some(request))
    }

    async fn execute(
        &self,
        token: &CancellationToken,
        live_output: Option<mpsc::UnboundedSender<String>>,
    ) -> Result<ToolResult> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        if let Some(live_tx) = live_output.filter(|_| self.streams) {
            let _ = live_tx.send("chunk one\n".to_string());
            let _ = live_tx.send("chunk two\n".to_string());
            // Let the forwarder drain before we return.
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        if self.wait_for_cancel {
            token.cancelled().await;
            return Err(scheduler_error::CancelledSnafu.build());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(ToolResult::text(format!(
            "ran with {}",
            serde_json::to_string(&self.args).unwrap_or_default()
        )))
    }

    fn updated_args_for(&self, modified_content: &str) -> Option<Value> {
        if self.confirm == ConfirmBehavior::Edit {
            let mut args = self.args.clone();
            args["content"] = Value::String(modified_content.to_string());
            Some(args)
        } else {
            None
        }
    }
}

// ── Harness ──────────────────────────────────────────────────────

struct Harness {
    scheduler: ToolScheduler,
    policy: Arc<SessionPolicy>,
    snapshots: Arc<StdMutex<Vec<Vec<ToolCall>>>>,
    completions: Arc<StdMutex<Vec<Vec<ToolCall>>>>,
    events: Arc<StdMutex<Vec<String>>>,
    _temp: tempfile::TempDir,
}

fn harness(tools: Vec<MockTool>, mode: ApprovalMode, allowlist: &[&str]) -> Harness {
    harness_with(tools, mode, allowlist, None)
}

fn harness_with(
    tools: Vec<MockTool>,
    mode: ApprovalMode,
    allowlist: &[&str],
    editor: Option<Arc<dyn EditorBridge>>,
) -> Harness {
    let mut registry = StaticToolRegistry::new();
    for tool in tools {
        registry.register(Arc::new(tool));
    }
    let policy = Arc::new(SessionPolicy::with_allowlist(
        mode,
        allowlist.iter().map(|s| s.to_string()).collect(),
    ));
    let temp = tempfile::tempdir().expect("temp dir");

    let mut config = SchedulerConfig::new(Arc::new(registry), temp.path())
        .with_policy(Arc::clone(&policy));
    if let Some(editor) = editor {
        config = config.with_editor(editor);
    }

    let snapshots: Arc<StdMutex<Vec<Vec<ToolCall>>>> = Arc::default();
    let completions: Arc<StdMutex<Vec<Vec<ToolCall>>>> = Arc::default();
    let events: Arc<StdMutex<Vec<String>>> = Arc::default();

    let on_update: ToolCallsUpdateFn = {
        let snapshots = Arc::clone(&snapshots);
        let events = Arc::clone(&events);
        Arc::new(move |calls: &[ToolCall]| {
            let summary: Vec<String> = calls
                .iter()
                .map(|c| format!("{}:{}", c.call_id(), c.status()))
                .collect();
            events
                .lock()
                .unwrap()
                .push(format!("update {}", summary.join(" ")));
            snapshots.lock().unwrap().push(calls.to_vec());
        })
    };
    let on_complete: AllCallsCompleteFn = {
        let completions = Arc::clone(&completions);
        let events = Arc::clone(&events);
        Arc::new(move |calls: &[ToolCall]| {
            let ids: Vec<&str> = calls.iter().map(ToolCall::call_id).collect();
            events
                .lock()
                .unwrap()
                .push(format!("complete {}", ids.join(" ")));
            completions.lock().unwrap().push(calls.to_vec());
        })
    };

    Harness {
        scheduler: ToolScheduler::new(config, on_update, on_complete),
        policy,
        snapshots,
        completions,
        events,
        _temp: temp,
    }
}

impl Harness {
    /// Wait until a call shows up in a snapshot with the given status;
    /// returns that call.
    async fn wait_for(&self, call_id: &str, status: ToolCallStatus) -> ToolCall {
        for _ in 0..500 {
            let found = self
                .snapshots
                .lock()
                .unwrap()
                .iter()
                .flat_map(|snapshot| snapshot.iter())
                .find(|call| call.call_id() == call_id && call.status() == status)
                .cloned();
            if let Some(call) = found {
                return call;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("call {call_id} never reached {status}");
    }

    fn statuses_seen(&self, call_id: &str) -> Vec<ToolCallStatus> {
        let mut seen = Vec::new();
        for snapshot in self.snapshots.lock().unwrap().iter() {
            for call in snapshot {
                if call.call_id() == call_id && seen.last() != Some(&call.status()) {
                    seen.push(call.status());
                }
            }
        }
        seen
    }

    fn completion(&self) -> Vec<ToolCall> {
        let completions = self.completions.lock().unwrap();
        assert_eq!(completions.len(), 1, "exactly one completion per batch");
        completions[0].clone()
    }
}

fn request(call_id: &str, name: &str, args: Value) -> ToolRequest {
    ToolRequest::new(call_id, name, args, "prompt-1")
}

fn envelope_output(call: &ToolCall) -> String {
    call.response()
        .and_then(|parts| parts.first())
        .and_then(|part| part.function_response.as_ref())
        .map(|fr| fr.response.output.clone())
        .expect("terminal call has an envelope")
}

// ── Lifecycle ────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_batch_lifecycle() {
    let tool = MockTool::new("read_file", ToolKind::Read, ConfirmBehavior::Never);
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    h.scheduler
        .schedule(
            vec![request("c1", "read_file", json!({"path": "/a"}))],
            CancellationToken::new(),
        )
        .await;

    assert_eq!(
        h.statuses_seen("c1"),
        vec![
            ToolCallStatus::Validating,
            ToolCallStatus::Scheduled,
            ToolCallStatus::Executing,
            ToolCallStatus::Success,
        ]
    );
    assert_eq!(executed.load(Ordering::SeqCst), 1);

    let calls = h.completion();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_terminal());
    assert!(envelope_output(&calls[0]).contains("ran with"));
    assert!(calls[0].core().end_time_ms.is_some());

    // Completion is the last event of the batch.
    let events = h.events.lock().unwrap();
    assert!(events.last().unwrap().starts_with("complete"));
}

#[tokio::test]
async fn test_empty_batch_still_completes() {
    let h = harness(vec![], ApprovalMode::Default, &[]);
    h.scheduler
        .schedule(vec![], CancellationToken::new())
        .await;
    assert!(h.completion().is_empty());
}

#[tokio::test]
async fn test_unknown_tool_errors_with_suggestion() {
    let h = harness(
        vec![MockTool::new(
            "read_file",
            ToolKind::Read,
            ConfirmBehavior::Never,
        )],
        ApprovalMode::Default,
        &[],
    );

    h.scheduler
        .schedule(
            vec![request("c1", "red_file", json!({}))],
            CancellationToken::new(),
        )
        .await;

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Error);
    let output = envelope_output(&calls[0]);
    assert!(output.contains("Tool \"red_file\" not found"));
    assert!(output.contains("Did you mean \"read_file\"?"));
}

#[tokio::test]
async fn test_invalid_params_error() {
    let h = harness(
        vec![MockTool::new(
            "read_file",
            ToolKind::Read,
            ConfirmBehavior::Never,
        )],
        ApprovalMode::Default,
        &[],
    );

    h.scheduler
        .schedule(
            vec![request("c1", "read_file", json!({"invalid": true}))],
            CancellationToken::new(),
        )
        .await;

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Error);
    assert!(envelope_output(&calls[0]).contains("Invalid parameters"));
}

#[tokio::test]
async fn test_errors_do_not_cancel_siblings() {
    let good = MockTool::new("read_file", ToolKind::Read, ConfirmBehavior::Never);
    let executed = good.executed();
    let h = harness(vec![good], ApprovalMode::Default, &[]);

    h.scheduler
        .schedule(
            vec![
                request("bad", "no_such_tool", json!({})),
                request("good", "read_file", json!({})),
            ],
            CancellationToken::new(),
        )
        .await;

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Error);
    assert_eq!(calls[1].status(), ToolCallStatus::Success);
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

// ── Cancellation ─────────────────────────────────────────────────

#[tokio::test]
async fn test_pre_fired_signal_cancels_without_invoking() {
    let tool = MockTool::new("read_file", ToolKind::Read, ConfirmBehavior::Never);
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let token = CancellationToken::new();
    token.cancel();
    h.scheduler
        .schedule(vec![request("c1", "read_file", json!({}))], token)
        .await;

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Cancelled);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_abort_during_confirmation_cancels_and_preserves_diff() {
    let tool = MockTool::edit();
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let token = CancellationToken::new();
    let scheduler = h.scheduler.clone();
    let schedule_token = token.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![request("c1", "edit_file", json!({"content": "new"}))],
                schedule_token,
            )
            .await;
    });

    h.wait_for("c1", ToolCallStatus::AwaitingApproval).await;
    token.cancel();
    task.await.unwrap();

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Cancelled);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
    let diff = calls[0]
        .result_display()
        .and_then(ResultDisplay::as_diff)
        .expect("cancelled edit keeps its diff");
    assert_eq!(diff.file_name, "a.txt");
    assert!(diff.file_diff.contains("+new"));
}

#[tokio::test]
async fn test_abort_during_execution_cancels() {
    let mut tool = MockTool::new("watch", ToolKind::Other, ConfirmBehavior::Never);
    tool.wait_for_cancel = true;
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let token = CancellationToken::new();
    let scheduler = h.scheduler.clone();
    let schedule_token = token.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(vec![request("c1", "watch", json!({}))], schedule_token)
            .await;
    });

    h.wait_for("c1", ToolCallStatus::Executing).await;
    token.cancel();
    task.await.unwrap();

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Cancelled);
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

// ── Allowlist and approval modes ─────────────────────────────────

#[tokio::test]
async fn test_piped_suffix_requires_confirmation() {
    // Scenario A: a permitted prefix must not approve the pipeline.
    let tool = MockTool::shell();
    let executed = tool.executed();
    let h = harness(
        vec![tool],
        ApprovalMode::Default,
        &["run_shell_command(echo foo)"],
    );

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![request(
                    "c1",
                    "run_shell_command",
                    json!({"command": r#"echo foo | echo "evil""#}),
                )],
                CancellationToken::new(),
            )
            .await;
    });

    let awaiting = h.wait_for("c1", ToolCallStatus::AwaitingApproval).await;
    assert_eq!(executed.load(Ordering::SeqCst), 0);

    awaiting
        .confirmation_details()
        .unwrap()
        .confirm(ConfirmationOutcome::Cancel, None);
    task.await.unwrap();

    assert_eq!(h.completion()[0].status(), ToolCallStatus::Cancelled);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_yolo_mode_bypasses_confirmation() {
    // Scenario B: same command, Yolo mode.
    let tool = MockTool::shell();
    let executed = tool.executed();
    let h = harness(
        vec![tool],
        ApprovalMode::Yolo,
        &["run_shell_command(echo foo)"],
    );

    h.scheduler
        .schedule(
            vec![request(
                "c1",
                "run_shell_command",
                json!({"command": r#"echo foo | echo "evil""#}),
            )],
            CancellationToken::new(),
        )
        .await;

    assert_eq!(h.completion()[0].status(), ToolCallStatus::Success);
    assert_eq!(executed.load(Ordering::SeqCst), 1);
    assert!(!h
        .statuses_seen("c1")
        .contains(&ToolCallStatus::AwaitingApproval));
}

#[tokio::test]
async fn test_fully_allowlisted_chain_auto_approves() {
    // Scenario C: every sub-command matches, no prompt.
    let tool = MockTool::shell();
    let executed = tool.executed();
    let h = harness(
        vec![tool],
        ApprovalMode::Default,
        &[
            "run_shell_command(echo foo)",
            "run_shell_command(echo bar)",
        ],
    );

    h.scheduler
        .schedule(
            vec![request(
                "c1",
                "run_shell_command",
                json!({"command": "echo foo && echo bar"}),
            )],
            CancellationToken::new(),
        )
        .await;

    assert_eq!(h.completion()[0].status(), ToolCallStatus::Success);
    assert_eq!(executed.load(Ordering::SeqCst), 1);
    assert!(!h
        .statuses_seen("c1")
        .contains(&ToolCallStatus::AwaitingApproval));
}

#[tokio::test]
async fn test_auto_edit_mode_skips_edit_confirmation() {
    let tool = MockTool::edit();
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::AutoEdit, &[]);

    h.scheduler
        .schedule(
            vec![request("c1", "edit_file", json!({"content": "x"}))],
            CancellationToken::new(),
        )
        .await;

    assert_eq!(h.completion()[0].status(), ToolCallStatus::Success);
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

// ── Confirmation outcomes ────────────────────────────────────────

#[tokio::test]
async fn test_cancel_outcome_preserves_edit_diff() {
    // Scenario G.
    let tool = MockTool::edit();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![request("c1", "edit_file", json!({"content": "updated"}))],
                CancellationToken::new(),
            )
            .await;
    });

    let awaiting = h.wait_for("c1", ToolCallStatus::AwaitingApproval).await;
    awaiting
        .confirmation_details()
        .unwrap()
        .confirm(ConfirmationOutcome::Cancel, None);
    task.await.unwrap();

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Cancelled);
    assert_eq!(envelope_output(&calls[0]), "Tool call cancelled by user.");
    let diff = calls[0]
        .result_display()
        .and_then(ResultDisplay::as_diff)
        .expect("diff preserved");
    assert_eq!(diff.file_name, "a.txt");
    assert!(diff.file_diff.contains("+updated"));
}

#[tokio::test]
async fn test_proceed_always_on_edit_auto_approves_batch_siblings() {
    // Scenario H: three edits, one ProceedAlways.
    let tool = MockTool::edit();
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![
                    request("e1", "edit_file", json!({"content": "one"})),
                    request("e2", "edit_file", json!({"content": "two"})),
                    request("e3", "edit_file", json!({"content": "three"})),
                ],
                CancellationToken::new(),
            )
            .await;
    });

    let first = h.wait_for("e1", ToolCallStatus::AwaitingApproval).await;
    h.wait_for("e3", ToolCallStatus::AwaitingApproval).await;
    first
        .confirmation_details()
        .unwrap()
        .confirm(ConfirmationOutcome::ProceedAlways, None);
    task.await.unwrap();

    let calls = h.completion();
    assert!(calls
        .iter()
        .all(|call| call.status() == ToolCallStatus::Success));
    assert_eq!(executed.load(Ordering::SeqCst), 3);
    assert_eq!(h.policy.approval_mode(), ApprovalMode::AutoEdit);
}

#[tokio::test]
async fn test_proceed_always_on_exec_extends_allowlist() {
    let tool = MockTool::shell();
    let executed = tool.executed();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![
                    request("s1", "run_shell_command", json!({"command": "git status"})),
                    request("s2", "run_shell_command", json!({"command": "git status"})),
                ],
                CancellationToken::new(),
            )
            .await;
    });

    let first = h.wait_for("s1", ToolCallStatus::AwaitingApproval).await;
    h.wait_for("s2", ToolCallStatus::AwaitingApproval).await;
    first
        .confirmation_details()
        .unwrap()
        .confirm(ConfirmationOutcome::ProceedAlways, None);
    task.await.unwrap();

    let calls = h.completion();
    assert!(calls
        .iter()
        .all(|call| call.status() == ToolCallStatus::Success));
    assert_eq!(executed.load(Ordering::SeqCst), 2);
    assert!(h
        .policy
        .allowlist()
        .contains(&"run_shell_command(git status)".to_string()));
}

#[tokio::test]
async fn test_proceed_once_payload_rebuilds_invocation() {
    let tool = MockTool::edit();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![request("c1", "edit_file", json!({"content": "proposed"}))],
                CancellationToken::new(),
            )
            .await;
    });

    let awaiting = h.wait_for("c1", ToolCallStatus::AwaitingApproval).await;
    awaiting.confirmation_details().unwrap().confirm(
        ConfirmationOutcome::ProceedOnce,
        Some(ConfirmationPayload::with_content("revised")),
    );
    task.await.unwrap();

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Success);
    // The invocation ran with the revised content, not the proposal.
    assert!(envelope_output(&calls[0]).contains("revised"));
    assert!(!envelope_output(&calls[0]).contains("proposed"));
}

#[tokio::test]
async fn test_stale_confirmation_is_ignored() {
    let tool = MockTool::edit();
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![request("c1", "edit_file", json!({"content": "x"}))],
                CancellationToken::new(),
            )
            .await;
    });

    let awaiting = h.wait_for("c1", ToolCallStatus::AwaitingApproval).await;
    let details = awaiting.confirmation_details().unwrap().clone();
    details.confirm(ConfirmationOutcome::ProceedOnce, None);
    // A second answer races the first; the call has already left
    // awaiting_approval by the time it is processed.
    details.confirm(ConfirmationOutcome::Cancel, None);
    task.await.unwrap();

    assert_eq!(h.completion()[0].status(), ToolCallStatus::Success);
}

// ── ModifyWithEditor ─────────────────────────────────────────────

struct FixedEditor {
    revised: Option<String>,
    opened: Arc<AtomicUsize>,
}

#[async_trait]
impl EditorBridge for FixedEditor {
    fn preferred_editor(&self) -> Option<String> {
        Some("vim".to_string())
    }

    async fn open_diff(
        &self,
        _file_path: &Path,
        _original: &str,
        _proposed: &str,
    ) -> Result<Option<String>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.revised.clone())
    }
}

#[tokio::test]
async fn test_modify_with_editor_regenerates_details() {
    let tool = MockTool::edit();
    let opened = Arc::new(AtomicUsize::new(0));
    let editor = Arc::new(FixedEditor {
        revised: Some("edited in vim".to_string()),
        opened: Arc::clone(&opened),
    });
    let h = harness_with(vec![tool], ApprovalMode::Default, &[], Some(editor));

    let scheduler = h.scheduler.clone();
    let task = tokio::spawn(async move {
        scheduler
            .schedule(
                vec![request("c1", "edit_file", json!({"content": "proposed"}))],
                CancellationToken::new(),
            )
            .await;
    });

    let awaiting = h.wait_for("c1", ToolCallStatus::AwaitingApproval).await;
    awaiting
        .confirmation_details()
        .unwrap()
        .confirm(ConfirmationOutcome::ModifyWithEditor, None);

    // Wait until the regenerated details carry the revision.
    let mut regenerated = None;
    for _ in 0..500 {
        let snapshot = h.snapshots.lock().unwrap().last().cloned();
        if let Some(calls) = snapshot {
            if let Some(details) = calls[0].confirmation_details() {
                if let ConfirmationKind::Edit { new_content, .. } = &details.request.kind {
                    if new_content == "edited in vim" {
                        regenerated = Some(details.clone());
                        break;
                    }
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    let regenerated = regenerated.expect("details regenerated after editor close");
    assert_eq!(opened.load(Ordering::SeqCst), 1);

    regenerated.confirm(ConfirmationOutcome::ProceedOnce, None);
    task.await.unwrap();

    let calls = h.completion();
    assert_eq!(calls[0].status(), ToolCallStatus::Success);
    assert!(envelope_output(&calls[0]).contains("edited in vim"));
}

// ── Streaming output ─────────────────────────────────────────────

#[tokio::test]
async fn test_streaming_tool_folds_live_output_into_snapshots() {
    let mut tool = MockTool::new("tail_log", ToolKind::Other, ConfirmBehavior::Never);
    tool.streams = true;
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    h.scheduler
        .schedule(
            vec![request("c1", "tail_log", json!({}))],
            CancellationToken::new(),
        )
        .await;

    assert_eq!(h.completion()[0].status(), ToolCallStatus::Success);
    let saw_live_output = h.snapshots.lock().unwrap().iter().any(|snapshot| {
        snapshot.iter().any(|call| {
            matches!(
                call,
                ToolCall::Executing { live_output: Some(text), .. } if text.contains("chunk one")
            )
        })
    });
    assert!(saw_live_output, "live output never appeared in a snapshot");
}

// ── Batch serialization ──────────────────────────────────────────

#[tokio::test]
async fn test_batches_are_serialized_in_admission_order() {
    let mut slow = MockTool::new("slow", ToolKind::Other, ConfirmBehavior::Never);
    slow.delay = Some(Duration::from_millis(30));
    let fast = MockTool::new("fast", ToolKind::Other, ConfirmBehavior::Never);
    let h = harness(vec![slow, fast], ApprovalMode::Default, &[]);

    let first = h
        .scheduler
        .schedule(
            vec![request("b1", "slow", json!({}))],
            CancellationToken::new(),
        );
    let second = h
        .scheduler
        .schedule(
            vec![request("b2", "fast", json!({}))],
            CancellationToken::new(),
        );
    tokio::join!(first, second);

    let events = h.events.lock().unwrap().clone();
    let b1_complete = events
        .iter()
        .position(|e| e.starts_with("complete") && e.contains("b1"))
        .expect("first batch completed");
    let b2_first_update = events
        .iter()
        .position(|e| e.contains("b2"))
        .expect("second batch updated");
    assert!(
        b1_complete < b2_first_update,
        "batch 2 must not start before batch 1 completes: {events:#?}"
    );

    let completions = h.completions.lock().unwrap();
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[0][0].call_id(), "b1");
    assert_eq!(completions[1][0].call_id(), "b2");
}

#[tokio::test]
async fn test_snapshot_keeps_insertion_order() {
    let tool = MockTool::new("read_file", ToolKind::Read, ConfirmBehavior::Never);
    let h = harness(vec![tool], ApprovalMode::Default, &[]);

    h.scheduler
        .schedule(
            vec![
                request("c1", "read_file", json!({})),
                request("c2", "read_file", json!({})),
                request("c3", "read_file", json!({})),
            ],
            CancellationToken::new(),
        )
        .await;

    for snapshot in h.snapshots.lock().unwrap().iter() {
        let ids: Vec<&str> = snapshot.iter().map(ToolCall::call_id).collect();
        let expected: Vec<&str> = ["c1", "c2", "c3"][..ids.len()].to_vec();
        assert_eq!(ids, expected);
    }
}
