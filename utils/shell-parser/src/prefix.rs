//! Command-prefix (stem) extraction.

use crate::words::split_words;

/// Compute the canonical allowlist key for a command.
///
/// `stemmables` lists command roots whose allowlist granularity extends
/// one sub-command deeper; entries may be multi-word (`"gh run"`). The
/// result is the longest leading word sequence that equals a stemmable
/// entry, plus exactly one following token:
///
/// - `command_prefix("git status -v", ["git"])` is `"git status"`.
/// - `command_prefix("gh run view --web", ["gh", "gh run"])` is
///   `"gh run view"`.
/// - A command the match consumes entirely is returned whole.
/// - A command whose root is not stemmable yields just its first token.
/// - Blank input yields the empty string.
///
/// The function is idempotent on its own output.
pub fn command_prefix<S: AsRef<str>>(command: &str, stemmables: &[S]) -> String {
    let words = split_words(command);
    if words.is_empty() {
        return String::new();
    }

    let mut matched = 0;
    for k in 1..=words.len() {
        let joined = words[..k].join(" ");
        if stemmables.iter().any(|s| s.as_ref() == joined) {
            matched = k;
        } else {
            // Keep scanning only while the accumulated words can still
            // grow into a longer multi-word entry.
            let extendable = stemmables
                .iter()
                .any(|s| s.as_ref().starts_with(&format!("{joined} ")));
            if !extendable {
                break;
            }
        }
    }

    if matched == words.len() {
        return command.trim().to_string();
    }

    words[..matched + 1].join(" ")
}

#[cfg(test)]
#[path = "prefix.test.rs"]
mod tests;
