use super::*;
use pretty_assertions::assert_eq;

const STEMS: &[&str] = &["git", "npm", "npx", "gh", "gh run"];

#[test]
fn test_single_word_stem_takes_one_subcommand() {
    assert_eq!(command_prefix("git status -v", STEMS), "git status");
}

#[test]
fn test_multi_word_stem_takes_one_subcommand() {
    assert_eq!(command_prefix("gh run view --web", STEMS), "gh run view");
}

#[test]
fn test_match_consuming_whole_command_returns_it() {
    assert_eq!(
        command_prefix("git checkout main", &["git", "git checkout"]),
        "git checkout main"
    );
}

#[test]
fn test_bare_stemmable_returns_itself() {
    assert_eq!(command_prefix("git", STEMS), "git");
}

#[test]
fn test_unknown_root_returns_first_token() {
    assert_eq!(command_prefix("ls -la /tmp", STEMS), "ls");
}

#[test]
fn test_blank_input_returns_empty() {
    assert_eq!(command_prefix("", STEMS), "");
    assert_eq!(command_prefix("   ", STEMS), "");
}

#[test]
fn test_longest_stem_wins() {
    // "gh" alone would stop at "gh run"; the longer "gh run" entry
    // extends the key one word further.
    assert_eq!(command_prefix("gh run list", &["gh"]), "gh run");
    assert_eq!(command_prefix("gh run list", STEMS), "gh run list");
}

#[test]
fn test_scan_continues_through_strict_prefixes() {
    // "git remote" is not an entry, but "git remote add" is reachable.
    let stems = ["git", "git remote add"];
    assert_eq!(
        command_prefix("git remote add origin url", &stems),
        "git remote add origin"
    );
    assert_eq!(command_prefix("git remote rm origin", &stems), "git remote");
}

#[test]
fn test_quoted_arguments_stay_single_tokens() {
    assert_eq!(
        command_prefix("git commit -m 'a b c'", STEMS),
        "git commit"
    );
}

#[test]
fn test_idempotent_on_own_output() {
    let commands = [
        "git status -v",
        "gh run view --web",
        "git checkout main",
        "ls -la /tmp",
        "git",
        "npm install --save-dev typescript",
    ];
    for command in commands {
        let once = command_prefix(command, STEMS);
        let twice = command_prefix(&once, STEMS);
        assert_eq!(twice, once, "command: {command}");
    }
}
