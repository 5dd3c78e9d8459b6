use super::*;
use pretty_assertions::assert_eq;

fn edit_kind() -> ConfirmationKind {
    ConfirmationKind::Edit {
        file_name: "main.rs".to_string(),
        file_path: PathBuf::from("/work/src/main.rs"),
        file_diff: "--- a/main.rs\n+++ b/main.rs\n".to_string(),
        original_content: "old".to_string(),
        new_content: "new".to_string(),
        is_modifying: None,
    }
}

#[test]
fn test_is_edit() {
    assert!(edit_kind().is_edit());
    assert!(!ConfirmationKind::Exec {
        command: "ls".to_string(),
        root_command: "ls".to_string(),
    }
    .is_edit());
}

#[test]
fn test_pending_diff() {
    let kind = edit_kind();
    let (diff, name) = kind.pending_diff().expect("edit has a pending diff");
    assert!(diff.starts_with("--- a/main.rs"));
    assert_eq!(name, "main.rs");

    let info = ConfirmationKind::Info {
        prompt: "Fetch?".to_string(),
        urls: None,
    };
    assert_eq!(info.pending_diff(), None);
}

#[test]
fn test_serde_type_tag_flattens() {
    let req = ConfirmationRequest::new(
        "Run command",
        ConfirmationKind::Exec {
            command: "git status".to_string(),
            root_command: "git status".to_string(),
        },
    );
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["type"], "exec");
    assert_eq!(json["title"], "Run command");
    assert_eq!(json["command"], "git status");
}

#[test]
fn test_mcp_round_trip() {
    let req = ConfirmationRequest::new(
        "Call MCP tool",
        ConfirmationKind::Mcp {
            server_name: "github".to_string(),
            tool_name: "github.list_files".to_string(),
            tool_display_name: "List Files".to_string(),
        },
    );
    let text = serde_json::to_string(&req).unwrap();
    let parsed: ConfirmationRequest = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, req);
}
