use super::*;
use pretty_assertions::assert_eq;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_edit_distance_basics() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("read_file", "read_file"), 0);
}

#[test]
fn test_closest_name_first() {
    let known = names(&["read_file", "write_file", "run_shell_command"]);
    let ranked = suggest_tool_names("red_file", &known);
    assert_eq!(ranked[0], "read_file");
}

#[test]
fn test_ties_break_lexicographically() {
    let known = names(&["bb", "ba", "ab"]);
    // All three are distance 1 from "aa" except "bb" (2).
    let ranked = suggest_tool_names("aa", &known);
    assert_eq!(ranked, vec!["ab", "ba", "bb"]);
}

#[test]
fn test_at_most_three_suggestions() {
    let known = names(&["a1", "a2", "a3", "a4", "a5"]);
    assert_eq!(suggest_tool_names("a0", &known).len(), 3);
}

#[test]
fn test_dotted_reference_considers_suffix() {
    let known = names(&["list_files", "read_file", "grep"]);
    let ranked = suggest_tool_names("github.list_files", &known);
    assert_eq!(ranked[0], "list_files");
}

#[test]
fn test_phrase_single() {
    let known = names(&["read_file"]);
    assert_eq!(
        suggestion_phrase("red_file", &known),
        " Did you mean \"read_file\"?"
    );
}

#[test]
fn test_phrase_multiple() {
    let known = names(&["read_file", "write_file", "glob"]);
    let phrase = suggestion_phrase("reed_file", &known);
    assert!(phrase.starts_with(" Did you mean one of: "));
    assert!(phrase.contains("\"read_file\""));
    assert!(phrase.ends_with('?'));
}

#[test]
fn test_phrase_empty_registry() {
    assert_eq!(suggestion_phrase("anything", &[]), "");
}
