use super::*;
use crate::confirmation::ConfirmationResponder;
use pretty_assertions::assert_eq;
use relay_protocol::ConfirmationOutcome;
use serde_json::json;
use tokio::sync::mpsc;

fn request() -> ToolRequest {
    ToolRequest::new("c1", "edit_file", json!({"path": "/a"}), "p1")
}

fn edit_details() -> ConfirmationDetails {
    let (tx, _rx) = mpsc::unbounded_channel();
    // The receiver is dropped: these tests never answer the prompt.
    ConfirmationDetails::new(
        ConfirmationRequest::new(
            "Apply edit",
            ConfirmationKind::Edit {
                file_name: "a.txt".to_string(),
                file_path: "/work/a.txt".into(),
                file_diff: "--- a.txt\n+++ a.txt\n-old\n+new\n".to_string(),
                original_content: "old".to_string(),
                new_content: "new".to_string(),
                is_modifying: None,
            },
        ),
        ConfirmationResponder::new("c1", tx),
    )
}

#[test]
fn test_transition_table() {
    use ToolCallStatus::*;
    let allowed = [
        (Validating, Scheduled),
        (Validating, AwaitingApproval),
        (Validating, Error),
        (Validating, Cancelled),
        (AwaitingApproval, Scheduled),
        (AwaitingApproval, Cancelled),
        (Scheduled, Executing),
        (Scheduled, Cancelled),
        (Executing, Success),
        (Executing, Error),
        (Executing, Cancelled),
    ];
    let all = [
        Validating,
        Scheduled,
        AwaitingApproval,
        Executing,
        Success,
        Error,
        Cancelled,
    ];
    for from in all {
        for to in all {
            assert_eq!(
                ToolCallStatus::can_transition(from, to),
                allowed.contains(&(from, to)),
                "{from} -> {to}"
            );
        }
    }
}

#[test]
fn test_terminal_statuses() {
    assert!(ToolCallStatus::Success.is_terminal());
    assert!(ToolCallStatus::Error.is_terminal());
    assert!(ToolCallStatus::Cancelled.is_terminal());
    assert!(!ToolCallStatus::Validating.is_terminal());
    assert!(!ToolCallStatus::AwaitingApproval.is_terminal());
    assert!(!ToolCallStatus::Executing.is_terminal());
}

#[test]
fn test_happy_path_transitions() {
    let call = ToolCall::validating(request());
    assert_eq!(call.status(), ToolCallStatus::Validating);

    let call = call.into_scheduled();
    assert_eq!(call.status(), ToolCallStatus::Scheduled);

    let call = call.into_executing();
    assert_eq!(call.status(), ToolCallStatus::Executing);

    let call = call.into_success(vec![], None);
    assert_eq!(call.status(), ToolCallStatus::Success);
    assert!(call.is_terminal());
    assert!(call.core().end_time_ms.is_some());
    assert!(call.core().duration_ms.is_some());
}

#[test]
fn test_invalid_transition_is_rejected() {
    let call = ToolCall::validating(request());
    // validating -> executing is not in the table; the call stays put.
    let call = call.into_executing();
    assert_eq!(call.status(), ToolCallStatus::Validating);

    let done = ToolCall::validating(request())
        .into_scheduled()
        .into_executing()
        .into_success(vec![], None);
    let still_done = done.into_scheduled();
    assert_eq!(still_done.status(), ToolCallStatus::Success);
}

#[test]
fn test_awaiting_approval_stashes_confirmation_data() {
    let call = ToolCall::validating(request()).into_awaiting_approval(edit_details());
    assert_eq!(call.status(), ToolCallStatus::AwaitingApproval);
    assert!(call.confirmation_details().is_some());
    assert!(call.core().confirmation.is_some());
}

#[test]
fn test_cancelled_edit_retains_diff() {
    let call = ToolCall::validating(request())
        .into_awaiting_approval(edit_details())
        .into_cancelled(vec![]);

    assert_eq!(call.status(), ToolCallStatus::Cancelled);
    let display = call.result_display().expect("display preserved");
    let diff = display.as_diff().expect("diff display");
    assert_eq!(diff.file_name, "a.txt");
    assert!(diff.file_diff.contains("+new"));
    assert_eq!(diff.original_content.as_deref(), Some("old"));
    assert_eq!(diff.new_content.as_deref(), Some("new"));
}

#[test]
fn test_cancelled_edit_retains_diff_through_scheduled() {
    // ProceedOnce then abort: the diff survives past approval.
    let call = ToolCall::validating(request())
        .into_awaiting_approval(edit_details())
        .into_scheduled()
        .into_cancelled(vec![]);
    assert!(call.result_display().and_then(ResultDisplay::as_diff).is_some());
}

#[test]
fn test_cancelled_non_edit_has_no_display() {
    let call = ToolCall::validating(request()).into_cancelled(vec![]);
    assert_eq!(call.result_display(), None);
}

#[test]
fn test_outcome_helpers_do_not_consume_details() {
    let details = edit_details();
    details.confirm(ConfirmationOutcome::Cancel, None);
    // Still usable: stale confirmations are simply dropped.
    details.confirm(ConfirmationOutcome::ProceedOnce, None);
}
