use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_approval_mode_default() {
    assert_eq!(ApprovalMode::default(), ApprovalMode::Default);
}

#[test]
fn test_approval_mode_predicates() {
    assert!(!ApprovalMode::Default.skips_all_confirmations());
    assert!(!ApprovalMode::AutoEdit.skips_all_confirmations());
    assert!(ApprovalMode::Yolo.skips_all_confirmations());

    assert!(!ApprovalMode::Default.auto_accepts_edits());
    assert!(ApprovalMode::AutoEdit.auto_accepts_edits());
    assert!(ApprovalMode::Yolo.auto_accepts_edits());
}

#[test]
fn test_approval_mode_serde_kebab_case() {
    let json = serde_json::to_string(&ApprovalMode::AutoEdit).unwrap();
    assert_eq!(json, "\"auto-edit\"");
    let parsed: ApprovalMode = serde_json::from_str("\"yolo\"").unwrap();
    assert_eq!(parsed, ApprovalMode::Yolo);
}

#[test]
fn test_approval_mode_display() {
    assert_eq!(ApprovalMode::AutoEdit.to_string(), "auto-edit");
}

#[test]
fn test_outcome_is_proceed() {
    assert!(ConfirmationOutcome::ProceedOnce.is_proceed());
    assert!(ConfirmationOutcome::ProceedAlways.is_proceed());
    assert!(ConfirmationOutcome::ProceedAlwaysServer.is_proceed());
    assert!(ConfirmationOutcome::ProceedAlwaysTool.is_proceed());
    assert!(!ConfirmationOutcome::ModifyWithEditor.is_proceed());
    assert!(!ConfirmationOutcome::Cancel.is_proceed());
}

#[test]
fn test_outcome_is_always() {
    assert!(ConfirmationOutcome::ProceedAlways.is_always());
    assert!(ConfirmationOutcome::ProceedAlwaysServer.is_always());
    assert!(ConfirmationOutcome::ProceedAlwaysTool.is_always());
    assert!(!ConfirmationOutcome::ProceedOnce.is_always());
    assert!(!ConfirmationOutcome::Cancel.is_always());
}

#[test]
fn test_outcome_serde_snake_case() {
    let json = serde_json::to_string(&ConfirmationOutcome::ProceedAlwaysServer).unwrap();
    assert_eq!(json, "\"proceed_always_server\"");
}

#[test]
fn test_payload_with_content() {
    let payload = ConfirmationPayload::with_content("revised");
    assert_eq!(payload.updated_content.as_deref(), Some("revised"));
    assert_eq!(ConfirmationPayload::default().updated_content, None);
}
