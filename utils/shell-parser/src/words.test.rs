use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_plain_words() {
    assert_eq!(split_words("git status -v"), vec!["git", "status", "-v"]);
}

#[test]
fn test_collapses_runs_of_whitespace() {
    assert_eq!(split_words("  git   status  "), vec!["git", "status"]);
}

#[test]
fn test_single_quoted_span_is_one_word() {
    assert_eq!(
        split_words("git commit -m 'fix: a b'"),
        vec!["git", "commit", "-m", "'fix: a b'"]
    );
}

#[test]
fn test_double_quoted_span_is_one_word() {
    assert_eq!(
        split_words(r#"echo "hello world" done"#),
        vec!["echo", r#""hello world""#, "done"]
    );
}

#[test]
fn test_escaped_space() {
    assert_eq!(split_words(r"ls my\ file"), vec!["ls", r"my\ file"]);
}

#[test]
fn test_adjacent_quote_glues_to_word() {
    assert_eq!(split_words("--msg='a b'"), vec!["--msg='a b'"]);
}

#[test]
fn test_empty_input() {
    assert_eq!(split_words(""), Vec::<String>::new());
    assert_eq!(split_words("   "), Vec::<String>::new());
}
