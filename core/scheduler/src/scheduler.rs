//! The core tool scheduler.
//!
//! [`ToolScheduler`] admits batches of tool-call requests and drives
//! each call through validation, confirmation, execution, and
//! completion. Batches are strictly serialized: while one batch is
//! non-terminal, later `schedule` calls queue behind it and resolve
//! only when their own batch completes.
//!
//! # Example
//!
//! ```ignore
//! let scheduler = ToolScheduler::new(config, on_update, on_complete);
//! scheduler.schedule(requests, token.clone()).await;
//! // on_complete has fired with every call terminal.
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use relay_protocol::ApprovalMode;
use relay_protocol::ConfirmationKind;
use relay_protocol::ConfirmationOutcome;
use relay_protocol::LlmContent;
use relay_protocol::Part;
use relay_protocol::ResultDisplay;
use relay_protocol::ToolKind;
use relay_protocol::ToolRequest;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

use crate::allowlist::does_invocation_match;
use crate::call::ToolCall;
use crate::call::ToolCallStatus;
use crate::config::SchedulerConfig;
use crate::confirmation::ConfirmationDetails;
use crate::confirmation::ConfirmationResponder;
use crate::confirmation::ConfirmationResponse;
use crate::error::scheduler_error;
use crate::error::SchedulerError;
use crate::response::convert_to_function_response;
use crate::result_persistence::truncate_and_persist;
use crate::suggestion::suggestion_phrase;
use crate::tool::DeclarativeTool;
use crate::tool::ToolInvocation;

/// Observer invoked with the full batch snapshot on every change.
pub type ToolCallsUpdateFn = Arc<dyn Fn(&[ToolCall]) + Send + Sync>;

/// Observer invoked exactly once per batch, with every call terminal.
pub type AllCallsCompleteFn = Arc<dyn Fn(&[ToolCall]) + Send + Sync>;

/// Envelope output for a user-cancelled call.
const CANCELLED_BY_USER_OUTPUT: &str = "Tool call cancelled by user.";

/// Envelope output for a call cancelled by the abort signal before it
/// ran.
const CANCELLED_BEFORE_EXECUTION_OUTPUT: &str = "Tool call cancelled before execution.";

/// Envelope output for a call cancelled while running.
const CANCELLED_DURING_EXECUTION_OUTPUT: &str = "Tool execution cancelled.";

struct PendingBatch {
    requests: Vec<ToolRequest>,
    token: CancellationToken,
    done: oneshot::Sender<()>,
}

#[derive(Default)]
struct BatchQueue {
    pending: VecDeque<PendingBatch>,
    draining: bool,
}

struct SchedulerInner {
    config: SchedulerConfig,
    on_update: ToolCallsUpdateFn,
    on_complete: AllCallsCompleteFn,
    queue: StdMutex<BatchQueue>,
}

/// Schedules batches of tool calls against a tool registry.
#[derive(Clone)]
pub struct ToolScheduler {
    inner: Arc<SchedulerInner>,
}

impl ToolScheduler {
    /// Create a scheduler.
    ///
    /// `on_update` fires with the batch snapshot after every call
    /// transition; `on_complete` fires exactly once per batch, strictly
    /// after the last update, with every call terminal. Observers run
    /// on the scheduler's tasks and should hand work off quickly.
    pub fn new(
        config: SchedulerConfig,
        on_update: ToolCallsUpdateFn,
        on_complete: AllCallsCompleteFn,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                config,
                on_update,
                on_complete,
                queue: StdMutex::new(BatchQueue::default()),
            }),
        }
    }

    /// Admit a batch of requests.
    ///
    /// Resolves when this batch's `on_complete` has fired. While
    /// another batch is non-terminal the new batch waits its turn;
    /// admission order is call order even for back-to-back synchronous
    /// calls. Failures surface on the individual calls and never
    /// escape here.
    pub async fn schedule(&self, requests: Vec<ToolRequest>, token: CancellationToken) {
        let (done_tx, done_rx) = oneshot::channel();
        let start_drainer = {
            let mut queue = self.inner.queue.lock().expect("batch queue lock");
            queue.pending.push_back(PendingBatch {
                requests,
                token,
                done: done_tx,
            });
            if queue.draining {
                false
            } else {
                queue.draining = true;
                true
            }
        };

        if start_drainer {
            tokio::spawn(drain_batches(Arc::clone(&self.inner)));
        }

        // The drainer never drops a batch without answering.
        let _ = done_rx.await;
    }
}

impl std::fmt::Debug for ToolScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolScheduler")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Process queued batches in admission order until the queue is empty.
async fn drain_batches(inner: Arc<SchedulerInner>) {
    loop {
        let batch = {
            let mut queue = inner.queue.lock().expect("batch queue lock");
            match queue.pending.pop_front() {
                Some(batch) => batch,
                None => {
                    queue.draining = false;
                    return;
                }
            }
        };

        process_batch(&inner, batch.requests, batch.token).await;
        let _ = batch.done.send(());
    }
}

type BatchState = Arc<Mutex<Vec<ToolCall>>>;

/// Replace the call at `idx` through a state-transition closure.
fn transform_call<F>(calls: &mut [ToolCall], idx: usize, transition: F)
where
    F: FnOnce(ToolCall) -> ToolCall,
{
    let placeholder = ToolCall::validating(ToolRequest::new("", "", Value::Null, ""));
    let call = std::mem::replace(&mut calls[idx], placeholder);
    calls[idx] = transition(call);
}

fn error_response(name: &str, call_id: &str, message: &str) -> Vec<Part> {
    convert_to_function_response(name, call_id, &LlmContent::Text(message.to_string()))
}

/// Policy-level approval: `Yolo`, `AutoEdit` for edit-kind tools, or an
/// allowlist match. Read-through on every check.
fn policy_approves(
    inner: &SchedulerInner,
    tool: &dyn DeclarativeTool,
    invocation: &dyn ToolInvocation,
) -> bool {
    let mode = inner.config.policy.approval_mode();
    if mode == ApprovalMode::Yolo {
        return true;
    }
    if mode == ApprovalMode::AutoEdit && tool.kind() == ToolKind::Edit {
        return true;
    }
    does_invocation_match(tool, invocation, &inner.config.policy.allowlist())
}

async fn process_batch(
    inner: &Arc<SchedulerInner>,
    requests: Vec<ToolRequest>,
    token: CancellationToken,
) {
    let (confirm_tx, mut confirm_rx) = mpsc::unbounded_channel::<ConfirmationResponse>();
    let state: BatchState = Arc::new(Mutex::new(Vec::with_capacity(requests.len())));

    // Entry protocol, request by request.
    for request in requests {
        admit_request(inner, &state, &token, &confirm_tx, request).await;
    }

    // Confirmation phase: wait out awaiting-approval calls.
    loop {
        let awaiting = {
            let calls = state.lock().await;
            calls
                .iter()
                .any(|call| call.status() == ToolCallStatus::AwaitingApproval)
        };
        if !awaiting {
            break;
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                cancel_pending_calls(inner, &state).await;
                break;
            }
            response = confirm_rx.recv() => {
                // The channel cannot close while confirm_tx is held here.
                if let Some(response) = response {
                    handle_confirmation(inner, &state, &token, response).await;
                }
            }
        }
    }

    // Execution phase.
    execute_scheduled_calls(inner, &state, &token).await;

    // Completion: exactly once, strictly after the last update.
    let calls = state.lock().await;
    debug_assert!(calls.iter().all(ToolCall::is_terminal));
    (inner.on_complete)(&calls);
}

/// Run the entry protocol for one request.
async fn admit_request(
    inner: &Arc<SchedulerInner>,
    state: &BatchState,
    token: &CancellationToken,
    confirm_tx: &mpsc::UnboundedSender<ConfirmationResponse>,
    request: ToolRequest,
) {
    let call_id = request.call_id.clone();
    let name = request.name.clone();

    let idx = {
        let mut calls = state.lock().await;
        calls.push(ToolCall::validating(request));
        (inner.on_update)(&calls);
        calls.len() - 1
    };

    // Resolve the tool.
    let Some(tool) = inner.config.registry.get_tool(&name) else {
        let suggestion = suggestion_phrase(&name, &inner.config.registry.tool_names());
        let err = scheduler_error::ToolNotFoundSnafu {
            name: name.clone(),
            suggestion,
        }
        .build();
        fail_call(inner, state, idx, &name, &call_id, &err).await;
        return;
    };
    {
        let mut calls = state.lock().await;
        calls[idx].core_mut().tool = Some(Arc::clone(&tool));
    }

    // Build the invocation (parameter validation).
    let args = {
        let calls = state.lock().await;
        calls[idx].request().args.clone()
    };
    let invocation = match tool.build(args) {
        Ok(invocation) => invocation,
        Err(err) => {
            fail_call(inner, state, idx, &name, &call_id, &err).await;
            return;
        }
    };
    {
        let mut calls = state.lock().await;
        calls[idx].core_mut().invocation = Some(Arc::clone(&invocation));
    }

    // An already-fired signal cancels without touching the tool.
    if token.is_cancelled() {
        let mut calls = state.lock().await;
        transform_call(&mut calls, idx, |call| {
            call.into_cancelled(error_response(
                &name,
                &call_id,
                CANCELLED_BEFORE_EXECUTION_OUTPUT,
            ))
        });
        (inner.on_update)(&calls);
        return;
    }

    // Policy short-circuit: Yolo, AutoEdit on edits, allowlist match.
    if policy_approves(inner, tool.as_ref(), invocation.as_ref()) {
        let mut calls = state.lock().await;
        transform_call(&mut calls, idx, ToolCall::into_scheduled);
        (inner.on_update)(&calls);
        return;
    }

    // Ask the invocation itself.
    match invocation.should_confirm_execute(token).await {
        Ok(None) => {
            let mut calls = state.lock().await;
            transform_call(&mut calls, idx, ToolCall::into_scheduled);
            (inner.on_update)(&calls);
        }
        Ok(Some(request_data)) => {
            let details = ConfirmationDetails::new(
                request_data,
                ConfirmationResponder::new(&call_id, confirm_tx.clone()),
            );
            let mut calls = state.lock().await;
            transform_call(&mut calls, idx, |call| call.into_awaiting_approval(details));
            (inner.on_update)(&calls);
        }
        Err(err) if token.is_cancelled() || err.is_cancelled() => {
            // Cancellation wins over whatever the confirmation check
            // was in the middle of.
            let mut calls = state.lock().await;
            transform_call(&mut calls, idx, |call| {
                call.into_cancelled(error_response(
                    &name,
                    &call_id,
                    CANCELLED_BEFORE_EXECUTION_OUTPUT,
                ))
            });
            (inner.on_update)(&calls);
        }
        Err(err) => {
            fail_call(inner, state, idx, &name, &call_id, &err).await;
        }
    }
}

/// Terminate a call in the `error` state.
async fn fail_call(
    inner: &Arc<SchedulerInner>,
    state: &BatchState,
    idx: usize,
    name: &str,
    call_id: &str,
    err: &SchedulerError,
) {
    let message = err.to_string();
    debug!(call_id = %call_id, tool = %name, error = %message, "Tool call failed");
    let mut calls = state.lock().await;
    transform_call(&mut calls, idx, |call| {
        call.into_error(
            error_response(name, call_id, &message),
            Some(ResultDisplay::markdown(message.clone())),
        )
    });
    (inner.on_update)(&calls);
}

/// Cancel every call still short of execution (abort signal fired).
async fn cancel_pending_calls(inner: &Arc<SchedulerInner>, state: &BatchState) {
    let mut calls = state.lock().await;
    for idx in 0..calls.len() {
        let status = calls[idx].status();
        if status.is_terminal() || status == ToolCallStatus::Executing {
            continue;
        }
        let name = calls[idx].request().name.clone();
        let call_id = calls[idx].call_id().to_string();
        transform_call(&mut calls, idx, |call| {
            call.into_cancelled(error_response(
                &name,
                &call_id,
                CANCELLED_BEFORE_EXECUTION_OUTPUT,
            ))
        });
        (inner.on_update)(&calls);
    }
}

/// Auto-approve awaiting calls the (possibly just-mutated) policy now
/// covers.
async fn auto_approve_awaiting(inner: &Arc<SchedulerInner>, state: &BatchState) {
    let mut calls = state.lock().await;
    for idx in 0..calls.len() {
        if calls[idx].status() != ToolCallStatus::AwaitingApproval {
            continue;
        }
        let approved = {
            let core = calls[idx].core();
            match (&core.tool, &core.invocation) {
                (Some(tool), Some(invocation)) => {
                    policy_approves(inner, tool.as_ref(), invocation.as_ref())
                }
                _ => false,
            }
        };
        if approved {
            transform_call(&mut calls, idx, ToolCall::into_scheduled);
            (inner.on_update)(&calls);
        }
    }
}

/// Apply one user confirmation outcome.
async fn handle_confirmation(
    inner: &Arc<SchedulerInner>,
    state: &BatchState,
    token: &CancellationToken,
    response: ConfirmationResponse,
) {
    let idx = {
        let calls = state.lock().await;
        calls.iter().position(|call| {
            call.call_id() == response.call_id
                && call.status() == ToolCallStatus::AwaitingApproval
        })
    };
    let Some(idx) = idx else {
        // The call already left awaiting_approval; its handler is
        // never honored twice.
        debug!(call_id = %response.call_id, "Ignoring stale confirmation response");
        return;
    };

    match response.outcome {
        ConfirmationOutcome::Cancel => {
            let mut calls = state.lock().await;
            let name = calls[idx].request().name.clone();
            let call_id = calls[idx].call_id().to_string();
            transform_call(&mut calls, idx, |call| {
                call.into_cancelled(error_response(&name, &call_id, CANCELLED_BY_USER_OUTPUT))
            });
            (inner.on_update)(&calls);
        }
        ConfirmationOutcome::ModifyWithEditor => {
            modify_with_editor(inner, state, token, idx).await;
        }
        outcome => {
            apply_proceed(inner, state, idx, outcome, response.payload).await;
            auto_approve_awaiting(inner, state).await;
        }
    }
}

/// Handle the proceed family of outcomes: policy broadening, payload
/// substitution, then `scheduled`.
async fn apply_proceed(
    inner: &Arc<SchedulerInner>,
    state: &BatchState,
    idx: usize,
    outcome: ConfirmationOutcome,
    payload: Option<relay_protocol::ConfirmationPayload>,
) {
    let mut calls = state.lock().await;

    // Broaden the session policy before anything else so the re-scan
    // of sibling calls sees it.
    if outcome.is_always() {
        let core = calls[idx].core();
        let tool_name = core.request.name.clone();
        match core.confirmation.as_ref().map(|req| &req.kind) {
            Some(ConfirmationKind::Edit { .. }) => {
                inner.config.policy.set_approval_mode(ApprovalMode::AutoEdit);
            }
            Some(ConfirmationKind::Exec { root_command, .. }) => {
                inner
                    .config
                    .policy
                    .allow(format!("{tool_name}({root_command})"));
            }
            Some(ConfirmationKind::Mcp {
                server_name,
                tool_name: mcp_tool_name,
                ..
            }) => match outcome {
                ConfirmationOutcome::ProceedAlwaysServer => {
                    inner.config.policy.allow(server_name.clone());
                }
                ConfirmationOutcome::ProceedAlwaysTool => {
                    inner.config.policy.allow(mcp_tool_name.clone());
                }
                _ => inner.config.policy.allow(tool_name.clone()),
            },
            Some(ConfirmationKind::Info { .. }) | None => {
                inner.config.policy.allow(tool_name.clone());
            }
        }
    }

    // A ProceedOnce payload carries revised content for modifiable
    // tools: rebuild the invocation around it.
    if let Some(content) = payload.and_then(|p| p.updated_content) {
        let core = calls[idx].core();
        let rebuilt = match (&core.tool, &core.invocation) {
            (Some(tool), Some(invocation)) => invocation
                .updated_args_for(&content)
                .map(|args| tool.build(args)),
            _ => None,
        };
        match rebuilt {
            Some(Ok(new_invocation)) => {
                calls[idx].core_mut().invocation = Some(new_invocation);
            }
            Some(Err(err)) => {
                warn!(
                    call_id = %calls[idx].call_id(),
                    error = %err,
                    "Ignoring revised content that failed validation"
                );
            }
            None => {}
        }
    }

    transform_call(&mut calls, idx, ToolCall::into_scheduled);
    (inner.on_update)(&calls);
}

/// Round-trip a proposed edit through the external editor, then
/// regenerate the confirmation details.
async fn modify_with_editor(
    inner: &Arc<SchedulerInner>,
    state: &BatchState,
    token: &CancellationToken,
    idx: usize,
) {
    let Some(editor) = inner.config.editor.clone() else {
        warn!("ModifyWithEditor outcome with no editor bridge configured");
        return;
    };
    if editor.preferred_editor().is_none() {
        warn!("ModifyWithEditor outcome with no preferred editor");
        return;
    }

    // Pull what the editor needs and flag the call as being modified.
    let edit_context = {
        let mut calls = state.lock().await;
        let context = match &calls[idx] {
            ToolCall::AwaitingApproval { details, .. } => match &details.request.kind {
                ConfirmationKind::Edit {
                    file_path,
                    original_content,
                    new_content,
                    ..
                } => Some((
                    file_path.clone(),
                    original_content.clone(),
                    new_content.clone(),
                )),
                _ => None,
            },
            _ => None,
        };
        let Some(context) = context else {
            warn!(call_id = %calls[idx].call_id(), "ModifyWithEditor on a non-edit confirmation");
            return;
        };
        set_is_modifying(&mut calls[idx], Some(true));
        (inner.on_update)(&calls);
        context
    };
    let (file_path, original, proposed) = edit_context;

    let edited = editor.open_diff(&file_path, &original, &proposed).await;
    if let Some(on_editor_close) = &inner.config.on_editor_close {
        on_editor_close();
    }

    let mut calls = state.lock().await;
    if calls[idx].status() != ToolCallStatus::AwaitingApproval {
        return;
    }

    let revised = match edited {
        Ok(Some(revised)) => revised,
        Ok(None) => {
            set_is_modifying(&mut calls[idx], None);
            (inner.on_update)(&calls);
            return;
        }
        Err(err) => {
            warn!(call_id = %calls[idx].call_id(), error = %err, "External editor failed");
            set_is_modifying(&mut calls[idx], None);
            (inner.on_update)(&calls);
            return;
        }
    };

    // Rebuild the invocation around the revision and regenerate the
    // confirmation details from it.
    let name = calls[idx].request().name.clone();
    let call_id = calls[idx].call_id().to_string();
    let rebuilt = {
        let core = calls[idx].core();
        match (&core.tool, &core.invocation) {
            (Some(tool), Some(invocation)) => invocation
                .updated_args_for(&revised)
                .map(|args| tool.build(args)),
            _ => None,
        }
    };
    let new_invocation = match rebuilt {
        Some(Ok(invocation)) => invocation,
        Some(Err(err)) => {
            warn!(call_id = %call_id, error = %err, "Revised content failed validation");
            set_is_modifying(&mut calls[idx], None);
            (inner.on_update)(&calls);
            return;
        }
        None => {
            warn!(call_id = %call_id, "ModifyWithEditor on a non-modifiable invocation");
            set_is_modifying(&mut calls[idx], None);
            (inner.on_update)(&calls);
            return;
        }
    };
    calls[idx].core_mut().invocation = Some(Arc::clone(&new_invocation));

    match new_invocation.should_confirm_execute(token).await {
        Ok(Some(request_data)) => {
            if let ToolCall::AwaitingApproval { core, details } = &mut calls[idx] {
                details.request = request_data.clone();
                core.confirmation = Some(request_data);
            }
            (inner.on_update)(&calls);
        }
        Ok(None) => {
            transform_call(&mut calls, idx, ToolCall::into_scheduled);
            (inner.on_update)(&calls);
        }
        Err(err) if token.is_cancelled() || err.is_cancelled() => {
            transform_call(&mut calls, idx, |call| {
                call.into_cancelled(error_response(
                    &name,
                    &call_id,
                    CANCELLED_BEFORE_EXECUTION_OUTPUT,
                ))
            });
            (inner.on_update)(&calls);
        }
        Err(err) => {
            let message = err.to_string();
            transform_call(&mut calls, idx, |call| {
                call.into_error(
                    error_response(&name, &call_id, &message),
                    Some(ResultDisplay::markdown(message.clone())),
                )
            });
            (inner.on_update)(&calls);
        }
    }
}

/// Flip the `is_modifying` flag on an awaiting edit confirmation.
fn set_is_modifying(call: &mut ToolCall, value: Option<bool>) {
    if let ToolCall::AwaitingApproval { core, details } = call {
        if let ConfirmationKind::Edit { is_modifying, .. } = &mut details.request.kind {
            *is_modifying = value;
        }
        core.confirmation = Some(details.request.clone());
    }
}

/// Run every scheduled call, concurrently, each racing the abort
/// signal.
async fn execute_scheduled_calls(
    inner: &Arc<SchedulerInner>,
    state: &BatchState,
    token: &CancellationToken,
) {
    let mut handles = Vec::new();

    {
        let mut calls = state.lock().await;
        for idx in 0..calls.len() {
            if calls[idx].status() != ToolCallStatus::Scheduled {
                continue;
            }

            let name = calls[idx].request().name.clone();
            let call_id = calls[idx].call_id().to_string();

            // A fired signal cancels instead of starting.
            if token.is_cancelled() {
                transform_call(&mut calls, idx, |call| {
                    call.into_cancelled(error_response(
                        &name,
                        &call_id,
                        CANCELLED_BEFORE_EXECUTION_OUTPUT,
                    ))
                });
                (inner.on_update)(&calls);
                continue;
            }

            let core = calls[idx].core();
            let (tool, invocation) = match (&core.tool, &core.invocation) {
                (Some(tool), Some(invocation)) => (Arc::clone(tool), Arc::clone(invocation)),
                _ => {
                    let err = scheduler_error::InternalSnafu {
                        message: "scheduled call without an invocation".to_string(),
                    }
                    .build();
                    let message = err.to_string();
                    transform_call(&mut calls, idx, |call| {
                        call.into_error(
                            error_response(&name, &call_id, &message),
                            Some(ResultDisplay::markdown(message.clone())),
                        )
                    });
                    (inner.on_update)(&calls);
                    continue;
                }
            };

            transform_call(&mut calls, idx, ToolCall::into_executing);
            (inner.on_update)(&calls);

            handles.push(tokio::spawn(run_call(
                Arc::clone(inner),
                Arc::clone(state),
                token.clone(),
                idx,
                name,
                call_id,
                tool,
                invocation,
            )));
        }
    }

    for handle in handles {
        if let Err(err) = handle.await {
            warn!(error = %err, "Tool execution task panicked");
        }
    }
}

/// Execute one call and write its terminal state back.
#[allow(clippy::too_many_arguments)]
async fn run_call(
    inner: Arc<SchedulerInner>,
    state: BatchState,
    token: CancellationToken,
    idx: usize,
    name: String,
    call_id: String,
    tool: Arc<dyn DeclarativeTool>,
    invocation: Arc<dyn ToolInvocation>,
) {
    // Streaming tools get a live-output pipe folded into the call
    // record as chunks arrive.
    let live_tx = if tool.streams_output() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let state = Arc::clone(&state);
        let inner = Arc::clone(&inner);
        tokio::spawn(async move {
            while let Some(chunk) = rx.recv().await {
                let mut calls = state.lock().await;
                match &mut calls[idx] {
                    ToolCall::Executing { live_output, .. } => {
                        live_output.get_or_insert_with(String::new).push_str(&chunk);
                        (inner.on_update)(&calls);
                    }
                    _ => break,
                }
            }
        });
        Some(tx)
    } else {
        None
    };

    let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(scheduler_error::CancelledSnafu.build()),
        result = invocation.execute(&token, live_tx) => result,
    };

    match result {
        Ok(tool_result) => {
            // Post-process oversized text output before converting.
            let llm_content = match tool_result.llm_content {
                LlmContent::Text(text) => {
                    let processed = truncate_and_persist(
                        &text,
                        &call_id,
                        &inner.config.temp_dir,
                        &inner.config.truncation,
                    )
                    .await;
                    LlmContent::Text(processed.content)
                }
                other => other,
            };
            let response = convert_to_function_response(&name, &call_id, &llm_content);

            let mut calls = state.lock().await;
            transform_call(&mut calls, idx, |call| {
                call.into_success(response, tool_result.return_display)
            });
            (inner.on_update)(&calls);
        }
        Err(err) if err.is_cancelled() || token.is_cancelled() => {
            let mut calls = state.lock().await;
            transform_call(&mut calls, idx, |call| {
                call.into_cancelled(error_response(
                    &name,
                    &call_id,
                    CANCELLED_DURING_EXECUTION_OUTPUT,
                ))
            });
            (inner.on_update)(&calls);
        }
        Err(err) => {
            let message = err.to_string();
            let mut calls = state.lock().await;
            transform_call(&mut calls, idx, |call| {
                call.into_error(
                    error_response(&name, &call_id, &message),
                    Some(ResultDisplay::markdown(message.clone())),
                )
            });
            (inner.on_update)(&calls);
        }
    }
}

#[cfg(test)]
#[path = "scheduler.test.rs"]
mod tests;
