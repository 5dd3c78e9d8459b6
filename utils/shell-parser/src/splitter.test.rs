use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_single_command() {
    assert_eq!(split_commands("ls -la"), vec!["ls -la"]);
}

#[test]
fn test_and_chain() {
    assert_eq!(
        split_commands("ls && pwd && echo done"),
        vec!["ls", "pwd", "echo done"]
    );
}

#[test]
fn test_or_chain() {
    assert_eq!(split_commands("test -f x || touch x"), vec!["test -f x", "touch x"]);
}

#[test]
fn test_pipeline() {
    assert_eq!(
        split_commands("cat file | grep pattern | wc -l"),
        vec!["cat file", "grep pattern", "wc -l"]
    );
}

#[test]
fn test_semicolon_chain() {
    assert_eq!(split_commands("cd /tmp; ls"), vec!["cd /tmp", "ls"]);
}

#[test]
fn test_mixed_operators() {
    assert_eq!(
        split_commands("make build && make test | tee log; echo ok"),
        vec!["make build", "make test", "tee log", "echo ok"]
    );
}

#[test]
fn test_separators_inside_single_quotes() {
    assert_eq!(
        split_commands("echo 'a && b; c | d'"),
        vec!["echo 'a && b; c | d'"]
    );
}

#[test]
fn test_separators_inside_double_quotes() {
    assert_eq!(split_commands(r#"echo "a || b""#), vec![r#"echo "a || b""#]);
}

#[test]
fn test_separators_inside_backticks() {
    assert_eq!(
        split_commands("echo `date; whoami`"),
        vec!["echo `date; whoami`"]
    );
}

#[test]
fn test_backslash_escaped_separator() {
    assert_eq!(split_commands(r"echo a \| b"), vec![r"echo a \| b"]);
    assert_eq!(split_commands(r"echo a\;b"), vec![r"echo a\;b"]);
}

#[test]
fn test_escaped_quote_does_not_open_a_span() {
    // The \" is an escaped character, not a quote: the | still splits.
    assert_eq!(
        split_commands(r#"echo \" | cat"#),
        vec![r#"echo \""#, "cat"]
    );
}

#[test]
fn test_double_quote_inside_single_quotes_is_literal() {
    assert_eq!(
        split_commands(r#"echo '"' && ls"#),
        vec![r#"echo '"'"#, "ls"]
    );
}

#[test]
fn test_piped_suffix_splits() {
    assert_eq!(
        split_commands(r#"echo foo | echo "evil""#),
        vec!["echo foo", r#"echo "evil""#]
    );
}

#[test]
fn test_empty_fragments_discarded() {
    assert_eq!(split_commands("ls &&"), vec!["ls"]);
    assert_eq!(split_commands(";; ls ;;"), vec!["ls"]);
    assert_eq!(split_commands("   "), Vec::<String>::new());
    assert_eq!(split_commands(""), Vec::<String>::new());
}

#[test]
fn test_background_ampersand_is_not_a_separator() {
    assert_eq!(split_commands("sleep 5 & wait"), vec!["sleep 5 & wait"]);
}

#[test]
fn test_unterminated_quote_swallows_rest() {
    // An unterminated quote protects everything after it; the lexer
    // never splits inside what the shell would treat as one word.
    assert_eq!(split_commands("echo 'a && b"), vec!["echo 'a && b"]);
}

#[test]
fn test_trailing_backslash() {
    assert_eq!(split_commands(r"echo a\"), vec![r"echo a\"]);
}

#[test]
fn test_utf8_content_preserved() {
    assert_eq!(
        split_commands("echo 'héllo wörld' && echo 日本語"),
        vec!["echo 'héllo wörld'", "echo 日本語"]
    );
}

#[test]
fn test_split_then_join_round_trip_modulo_separators() {
    // Splitting and rejoining with a canonical separator keeps every
    // non-separator byte when quotes are balanced.
    let cases = [
        "a && b || c | d; e",
        "echo 'x; y' | tr a b",
        r#"printf "%s\n" one && printf '%s' two"#,
    ];
    for case in cases {
        let joined = split_commands(case).join(" ; ");
        let rejoined = split_commands(&joined);
        assert_eq!(rejoined, split_commands(case), "case: {case}");
    }
}
