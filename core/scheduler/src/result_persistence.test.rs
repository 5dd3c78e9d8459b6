use super::*;
use pretty_assertions::assert_eq;

fn settings(threshold: i64, truncate_lines: i32) -> TruncationSettings {
    TruncationSettings {
        threshold,
        truncate_lines,
    }
}

#[tokio::test]
async fn test_no_op_below_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let result = truncate_and_persist("small output", "call-1", dir.path(), &settings(1000, 100))
        .await;
    assert_eq!(result.content, "small output");
    assert_eq!(result.output_file, None);
    // Nothing was written.
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_no_op_at_exact_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let content = "x".repeat(100);
    let result = truncate_and_persist(&content, "call-1", dir.path(), &settings(100, 10)).await;
    assert_eq!(result.content, content);
    assert_eq!(result.output_file, None);
}

#[tokio::test]
async fn test_truncates_head_and_tail() {
    let dir = tempfile::tempdir().unwrap();
    let content: String = (0..2000)
        .map(|i| format!("line {i}\n"))
        .collect();
    let result = truncate_and_persist(&content, "call-1", dir.path(), &settings(100, 100)).await;

    // Head is truncate_lines / 5 = 20, tail is the remaining 80.
    assert!(result.content.contains("line 0\n"));
    assert!(result.content.contains("line 19\n"));
    assert!(!result.content.contains("\nline 20\n"));
    assert!(result.content.contains("... [CONTENT TRUNCATED] ..."));
    assert!(result.content.contains("line 1999"));
    assert!(result.content.contains("read_file"));
    assert!(result.content.contains("offset"));
    assert!(result.content.contains("limit"));

    let path = result.output_file.expect("output file written");
    assert_eq!(path, dir.path().join("call-1.output"));
    let saved = std::fs::read_to_string(&path).unwrap();
    // The full, untruncated line sequence is on disk.
    assert!(saved.contains("line 0"));
    assert!(saved.contains("line 1000"));
    assert!(saved.contains("line 1999"));
}

#[tokio::test]
async fn test_single_giant_line_is_wrapped() {
    let dir = tempfile::tempdir().unwrap();
    let content = "a".repeat(10_000);
    let result = truncate_and_persist(&content, "call-2", dir.path(), &settings(100, 10)).await;

    let saved = std::fs::read_to_string(dir.path().join("call-2.output")).unwrap();
    let widths: Vec<usize> = saved.lines().map(|l| l.chars().count()).collect();
    assert!(widths.iter().all(|w| *w <= 120));
    assert_eq!(widths.len(), 10_000usize.div_ceil(120));
    assert!(result.content.contains("... [CONTENT TRUNCATED] ..."));
}

#[tokio::test]
async fn test_many_short_lines_kept_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let content: String = (0..500).map(|i| format!("{i}\n")).collect();
    let result = truncate_and_persist(&content, "call-3", dir.path(), &settings(100, 50)).await;

    let saved = std::fs::read_to_string(dir.path().join("call-3.output")).unwrap();
    // Lines survive unwrapped and unmodified.
    assert!(saved.starts_with("0\n1\n2\n"));
    assert!(result.output_file.is_some());
}

#[tokio::test]
async fn test_call_id_path_traversal_is_stripped() {
    let dir = tempfile::tempdir().unwrap();
    let content = "a".repeat(2_000_000);
    let result =
        truncate_and_persist(&content, "../../etc/passwd", dir.path(), &settings(1000, 100))
            .await;

    let path = result.output_file.expect("output file written");
    assert_eq!(path, dir.path().join("passwd.output"));
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(path.exists());
}

#[tokio::test]
async fn test_parent_is_always_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let content = "b".repeat(500);
    for call_id in ["plain", "a/b/c", "../up", "weird name.txt"] {
        let result =
            truncate_and_persist(&content, call_id, dir.path(), &settings(100, 10)).await;
        let path = result.output_file.expect("output file written");
        assert_eq!(path.parent(), Some(dir.path()), "call_id: {call_id}");
    }
}

#[tokio::test]
async fn test_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("call-9.output"), "stale").unwrap();
    let content = "c".repeat(500);
    let result = truncate_and_persist(&content, "call-9", dir.path(), &settings(100, 10)).await;
    assert!(result.output_file.is_some());
    let saved = std::fs::read_to_string(dir.path().join("call-9.output")).unwrap();
    assert!(!saved.contains("stale"));
}

#[tokio::test]
async fn test_write_failure_annotates_and_drops_file() {
    let content = "d".repeat(500);
    let missing = std::path::Path::new("/nonexistent/relay-test-dir");
    let result = truncate_and_persist(&content, "call-4", missing, &settings(100, 10)).await;
    assert_eq!(result.output_file, None);
    assert!(result
        .content
        .contains("[Note: Could not save full output to file]"));
    assert!(result.content.contains("... [CONTENT TRUNCATED] ..."));
}

#[test]
fn test_sanitize_call_id() {
    assert_eq!(sanitize_call_id("call-1"), "call-1");
    assert_eq!(sanitize_call_id("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_call_id("a/b/c"), "c");
    assert_eq!(sanitize_call_id(".."), "call");
    assert_eq!(sanitize_call_id(""), "call");
}
