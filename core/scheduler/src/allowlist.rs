//! Allowlist pattern matching for pending invocations.
//!
//! Patterns take the form `ToolName` (any invocation of the tool) or
//! `ToolName(argPrefix)` (shell invocations whose command equals the
//! prefix or extends it at a word boundary). Shell commands composed of
//! chained sub-commands match only when **every** sub-command matches
//! independently, so a permitted prefix can never smuggle a piped or
//! chained suffix past the allowlist.

use relay_shell_parser::split_commands;

use crate::tool::command_argument;
use crate::tool::is_shell_like;
use crate::tool::DeclarativeTool;
use crate::tool::ToolInvocation;
use crate::tool::SHELL_TOOL_NAMES;

/// Parse a pattern into `(tool_name, arg_prefix)`.
///
/// Returns `None` for malformed patterns (an opening paren without a
/// terminating one); malformed patterns never match.
fn parse_pattern(pattern: &str) -> Option<(&str, Option<&str>)> {
    match pattern.find('(') {
        None => Some((pattern, None)),
        Some(open) => {
            let rest = &pattern[open + 1..];
            let arg = rest.strip_suffix(')')?;
            Some((&pattern[..open], Some(arg)))
        }
    }
}

/// Check a sub-command against an arg prefix: exact match, or the
/// prefix followed by a space.
fn prefix_matches_command(arg_prefix: &str, command: &str) -> bool {
    command == arg_prefix || command.starts_with(&format!("{arg_prefix} "))
}

/// Check one (sub-)command against the pattern list.
fn matches_any_pattern(candidates: &[&str], command: Option<&str>, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        let Some((tool_name, arg_prefix)) = parse_pattern(pattern) else {
            return false;
        };
        if !candidates.contains(&tool_name) {
            return false;
        }
        match arg_prefix {
            None => true,
            Some(prefix) => command.is_some_and(|cmd| prefix_matches_command(prefix, cmd)),
        }
    })
}

/// Decide whether a pending invocation matches the allowlist.
///
/// Shell-like invocations with a `command` argument are split into
/// their top-level sub-commands and match iff every sub-command
/// independently matches some pattern.
pub fn does_invocation_match(
    tool: &dyn DeclarativeTool,
    invocation: &dyn ToolInvocation,
    patterns: &[String],
) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let aliases = tool.aliases();
    let mut candidates: Vec<&str> = vec![tool.name()];
    candidates.extend(aliases.iter().map(String::as_str));

    let shell_like = is_shell_like(tool);
    if shell_like {
        for synonym in SHELL_TOOL_NAMES {
            if !candidates.contains(synonym) {
                candidates.push(synonym);
            }
        }
    }

    let command = command_argument(invocation);
    if shell_like {
        if let Some(command) = command {
            let sub_commands = split_commands(command);
            return !sub_commands.is_empty()
                && sub_commands
                    .iter()
                    .all(|sub| matches_any_pattern(&candidates, Some(sub), patterns));
        }
    }

    matches_any_pattern(&candidates, command, patterns)
}

#[cfg(test)]
#[path = "allowlist.test.rs"]
mod tests;
