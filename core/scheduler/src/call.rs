//! Per-call lifecycle state machine.
//!
//! A [`ToolCall`] is a closed sum keyed by status: fields that only
//! make sense for one state live on that variant. The scheduler is the
//! only mutator; observers receive cloned snapshots.

use std::sync::Arc;

use relay_protocol::ConfirmationKind;
use relay_protocol::ConfirmationRequest;
use relay_protocol::FileDiff;
use relay_protocol::Part;
use relay_protocol::ResultDisplay;
use relay_protocol::ToolRequest;
use serde::Deserialize;
use serde::Serialize;
use tracing::error;

use crate::confirmation::ConfirmationDetails;
use crate::tool::DeclarativeTool;
use crate::tool::ToolInvocation;

/// Status tag of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    /// Request admitted, tool and parameters being resolved.
    Validating,
    /// Approved (or exempt) and waiting to execute.
    Scheduled,
    /// Waiting on a user confirmation outcome.
    AwaitingApproval,
    /// The invocation is running.
    Executing,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Error,
    /// Cancelled before or during execution.
    Cancelled,
}

impl ToolCallStatus {
    /// Get the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCallStatus::Validating => "validating",
            ToolCallStatus::Scheduled => "scheduled",
            ToolCallStatus::AwaitingApproval => "awaiting_approval",
            ToolCallStatus::Executing => "executing",
            ToolCallStatus::Success => "success",
            ToolCallStatus::Error => "error",
            ToolCallStatus::Cancelled => "cancelled",
        }
    }

    /// Check whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ToolCallStatus::Success | ToolCallStatus::Error | ToolCallStatus::Cancelled
        )
    }

    /// Check whether the state machine allows `from` → `to`.
    pub fn can_transition(from: ToolCallStatus, to: ToolCallStatus) -> bool {
        use ToolCallStatus::*;
        matches!(
            (from, to),
            (Validating, Scheduled)
                | (Validating, AwaitingApproval)
                | (Validating, Error)
                | (Validating, Cancelled)
                | (AwaitingApproval, Scheduled)
                | (AwaitingApproval, Cancelled)
                | (Scheduled, Executing)
                | (Scheduled, Cancelled)
                | (Executing, Success)
                | (Executing, Error)
                | (Executing, Cancelled)
        )
    }
}

impl std::fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields shared by every call state.
#[derive(Clone)]
pub struct CallCore {
    /// The originating request.
    pub request: ToolRequest,
    /// The resolved tool, once resolution succeeded.
    pub tool: Option<Arc<dyn DeclarativeTool>>,
    /// The built invocation, once parameter validation succeeded.
    pub invocation: Option<Arc<dyn ToolInvocation>>,
    /// The last confirmation request shown for this call. Kept past
    /// approval so a cancelled edit can still surface its diff.
    pub confirmation: Option<ConfirmationRequest>,
    /// Unix-ms timestamp at admission.
    pub start_time_ms: i64,
    /// Unix-ms timestamp at the terminal transition.
    pub end_time_ms: Option<i64>,
    /// Wall time spent, stamped at the terminal transition.
    pub duration_ms: Option<i64>,
}

impl CallCore {
    /// Create the core for a freshly admitted request.
    pub fn new(request: ToolRequest) -> Self {
        Self {
            request,
            tool: None,
            invocation: None,
            confirmation: None,
            start_time_ms: chrono::Utc::now().timestamp_millis(),
            end_time_ms: None,
            duration_ms: None,
        }
    }

    fn stamp_end(&mut self) {
        let now = chrono::Utc::now().timestamp_millis();
        self.end_time_ms = Some(now);
        self.duration_ms = Some(now - self.start_time_ms);
    }

    /// The display a cancelled call retains: the full pending diff for
    /// edit confirmations, nothing otherwise.
    pub fn cancelled_display(&self) -> Option<ResultDisplay> {
        match self.confirmation.as_ref().map(|req| &req.kind) {
            Some(ConfirmationKind::Edit {
                file_name,
                file_diff,
                original_content,
                new_content,
                ..
            }) => Some(ResultDisplay::diff(FileDiff {
                file_diff: file_diff.clone(),
                file_name: file_name.clone(),
                original_content: Some(original_content.clone()),
                new_content: Some(new_content.clone()),
            })),
            _ => None,
        }
    }
}

impl std::fmt::Debug for CallCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallCore")
            .field("call_id", &self.request.call_id)
            .field("tool", &self.request.name)
            .field("start_time_ms", &self.start_time_ms)
            .field("end_time_ms", &self.end_time_ms)
            .finish_non_exhaustive()
    }
}

/// One tool call moving through its lifecycle.
#[derive(Debug, Clone)]
pub enum ToolCall {
    /// Request admitted, tool and parameters being resolved.
    Validating {
        /// Shared call fields.
        core: CallCore,
    },
    /// Approved (or exempt) and waiting to execute.
    Scheduled {
        /// Shared call fields.
        core: CallCore,
    },
    /// Waiting on a user confirmation outcome.
    AwaitingApproval {
        /// Shared call fields.
        core: CallCore,
        /// The prompt handed to the host UI.
        details: ConfirmationDetails,
    },
    /// The invocation is running.
    Executing {
        /// Shared call fields.
        core: CallCore,
        /// Accumulated live output for streaming tools.
        live_output: Option<String>,
    },
    /// Finished successfully.
    Success {
        /// Shared call fields.
        core: CallCore,
        /// Function-response parts for the model.
        response: Vec<Part>,
        /// Human-renderable outcome.
        result_display: Option<ResultDisplay>,
    },
    /// Finished with an error.
    Error {
        /// Shared call fields.
        core: CallCore,
        /// Function-response parts for the model.
        response: Vec<Part>,
        /// Human-renderable outcome.
        result_display: Option<ResultDisplay>,
    },
    /// Cancelled before or during execution.
    Cancelled {
        /// Shared call fields.
        core: CallCore,
        /// Function-response parts for the model.
        response: Vec<Part>,
        /// Human-renderable outcome; edits keep their pending diff.
        result_display: Option<ResultDisplay>,
    },
}

impl ToolCall {
    /// Admit a request in the `validating` state.
    pub fn validating(request: ToolRequest) -> Self {
        ToolCall::Validating {
            core: CallCore::new(request),
        }
    }

    /// The status tag.
    pub fn status(&self) -> ToolCallStatus {
        match self {
            ToolCall::Validating { .. } => ToolCallStatus::Validating,
            ToolCall::Scheduled { .. } => ToolCallStatus::Scheduled,
            ToolCall::AwaitingApproval { .. } => ToolCallStatus::AwaitingApproval,
            ToolCall::Executing { .. } => ToolCallStatus::Executing,
            ToolCall::Success { .. } => ToolCallStatus::Success,
            ToolCall::Error { .. } => ToolCallStatus::Error,
            ToolCall::Cancelled { .. } => ToolCallStatus::Cancelled,
        }
    }

    /// Shared fields, any state.
    pub fn core(&self) -> &CallCore {
        match self {
            ToolCall::Validating { core }
            | ToolCall::Scheduled { core }
            | ToolCall::AwaitingApproval { core, .. }
            | ToolCall::Executing { core, .. }
            | ToolCall::Success { core, .. }
            | ToolCall::Error { core, .. }
            | ToolCall::Cancelled { core, .. } => core,
        }
    }

    /// Shared fields, any state, mutable.
    pub fn core_mut(&mut self) -> &mut CallCore {
        match self {
            ToolCall::Validating { core }
            | ToolCall::Scheduled { core }
            | ToolCall::AwaitingApproval { core, .. }
            | ToolCall::Executing { core, .. }
            | ToolCall::Success { core, .. }
            | ToolCall::Error { core, .. }
            | ToolCall::Cancelled { core, .. } => core,
        }
    }

    /// The call id from the originating request.
    pub fn call_id(&self) -> &str {
        &self.core().request.call_id
    }

    /// The originating request.
    pub fn request(&self) -> &ToolRequest {
        &self.core().request
    }

    /// Check whether the call reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// The confirmation details while awaiting approval.
    pub fn confirmation_details(&self) -> Option<&ConfirmationDetails> {
        match self {
            ToolCall::AwaitingApproval { details, .. } => Some(details),
            _ => None,
        }
    }

    /// The function-response parts of a terminal call.
    pub fn response(&self) -> Option<&[Part]> {
        match self {
            ToolCall::Success { response, .. }
            | ToolCall::Error { response, .. }
            | ToolCall::Cancelled { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The renderable display of a terminal call.
    pub fn result_display(&self) -> Option<&ResultDisplay> {
        match self {
            ToolCall::Success { result_display, .. }
            | ToolCall::Error { result_display, .. }
            | ToolCall::Cancelled { result_display, .. } => result_display.as_ref(),
            _ => None,
        }
    }

    fn guard(&self, to: ToolCallStatus) -> bool {
        let from = self.status();
        if ToolCallStatus::can_transition(from, to) {
            return true;
        }
        error!(
            call_id = %self.call_id(),
            from = %from,
            to = %to,
            "Rejected invalid tool-call transition"
        );
        false
    }

    fn take_core(self) -> CallCore {
        match self {
            ToolCall::Validating { core }
            | ToolCall::Scheduled { core }
            | ToolCall::AwaitingApproval { core, .. }
            | ToolCall::Executing { core, .. }
            | ToolCall::Success { core, .. }
            | ToolCall::Error { core, .. }
            | ToolCall::Cancelled { core, .. } => core,
        }
    }

    /// Transition to `scheduled`.
    pub fn into_scheduled(self) -> Self {
        if !self.guard(ToolCallStatus::Scheduled) {
            return self;
        }
        ToolCall::Scheduled {
            core: self.take_core(),
        }
    }

    /// Transition to `awaiting_approval`, stashing the confirmation
    /// request data on the core for later diff preservation.
    pub fn into_awaiting_approval(self, details: ConfirmationDetails) -> Self {
        if !self.guard(ToolCallStatus::AwaitingApproval) {
            return self;
        }
        let mut core = self.take_core();
        core.confirmation = Some(details.request.clone());
        ToolCall::AwaitingApproval { core, details }
    }

    /// Transition to `executing`.
    pub fn into_executing(self) -> Self {
        if !self.guard(ToolCallStatus::Executing) {
            return self;
        }
        ToolCall::Executing {
            core: self.take_core(),
            live_output: None,
        }
    }

    /// Transition to `success`.
    pub fn into_success(self, response: Vec<Part>, result_display: Option<ResultDisplay>) -> Self {
        if !self.guard(ToolCallStatus::Success) {
            return self;
        }
        let mut core = self.take_core();
        core.stamp_end();
        ToolCall::Success {
            core,
            response,
            result_display,
        }
    }

    /// Transition to `error`.
    pub fn into_error(self, response: Vec<Part>, result_display: Option<ResultDisplay>) -> Self {
        if !self.guard(ToolCallStatus::Error) {
            return self;
        }
        let mut core = self.take_core();
        core.stamp_end();
        ToolCall::Error {
            core,
            response,
            result_display,
        }
    }

    /// Transition to `cancelled`, retaining any pending edit diff in
    /// the display.
    pub fn into_cancelled(self, response: Vec<Part>) -> Self {
        if !self.guard(ToolCallStatus::Cancelled) {
            return self;
        }
        let mut core = self.take_core();
        core.stamp_end();
        let result_display = core.cancelled_display();
        ToolCall::Cancelled {
            core,
            response,
            result_display,
        }
    }
}

#[cfg(test)]
#[path = "call.test.rs"]
mod tests;
