use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_new_is_model_originated() {
    let req = ToolRequest::new("call-1", "read_file", json!({"path": "/a"}), "prompt-1");
    assert!(!req.is_client_initiated);
    assert_eq!(req.call_id, "call-1");
    assert_eq!(req.name, "read_file");
    assert_eq!(req.prompt_id, "prompt-1");
}

#[test]
fn test_client_initiated_flag() {
    let req = ToolRequest::client_initiated("call-2", "save_memory", json!({}), "prompt-1");
    assert!(req.is_client_initiated);
}

#[test]
fn test_serde_round_trip() {
    let req = ToolRequest::new("c1", "grep", json!({"pattern": "foo"}), "p1");
    let text = serde_json::to_string(&req).unwrap();
    let parsed: ToolRequest = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, req);
}

#[test]
fn test_is_client_initiated_defaults_to_false() {
    let parsed: ToolRequest = serde_json::from_str(
        r#"{"call_id":"c1","name":"ls","args":{},"prompt_id":"p1"}"#,
    )
    .unwrap();
    assert!(!parsed.is_client_initiated);
}
