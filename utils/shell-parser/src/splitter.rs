//! Top-level sub-command splitting.

/// Split a command string into its top-level sub-commands.
///
/// Sub-commands are the fragments joined by `&&`, `||`, `|`, and `;`
/// outside of single quotes, double quotes, backtick quotes, and
/// backslash escapes. Fragments are trimmed; empty fragments are
/// discarded.
///
/// Redirections and parameter expansion are not interpreted: a `;`
/// inside `$(...)` is still a top-level separator here. That errs on
/// the side of producing more fragments, which is the safe direction
/// for an allowlist conjunction.
pub fn split_commands(command: &str) -> Vec<String> {
    let bytes = command.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    let mut in_single = false;
    let mut in_double = false;
    let mut in_backtick = false;

    let push = |start: usize, end: usize, parts: &mut Vec<String>| {
        let fragment = command[start..end].trim();
        if !fragment.is_empty() {
            parts.push(fragment.to_string());
        }
    };

    while pos < bytes.len() {
        let c = bytes[pos];

        // A backslash escapes the next byte everywhere except inside
        // single quotes, where it is literal.
        if c == b'\\' && !in_single && pos + 1 < bytes.len() {
            pos += 2;
            continue;
        }

        match c {
            b'\'' if !in_double && !in_backtick => {
                in_single = !in_single;
                pos += 1;
            }
            b'"' if !in_single && !in_backtick => {
                in_double = !in_double;
                pos += 1;
            }
            b'`' if !in_single && !in_double => {
                in_backtick = !in_backtick;
                pos += 1;
            }
            b'&' | b'|' | b';' if !in_single && !in_double && !in_backtick => {
                let double = pos + 1 < bytes.len() && bytes[pos + 1] == c;
                match c {
                    // && and || separate; a lone & (background) does not.
                    b'&' if double => {
                        push(start, pos, &mut parts);
                        pos += 2;
                        start = pos;
                    }
                    b'|' => {
                        push(start, pos, &mut parts);
                        pos += if double { 2 } else { 1 };
                        start = pos;
                    }
                    b';' => {
                        push(start, pos, &mut parts);
                        pos += 1;
                        start = pos;
                    }
                    _ => pos += 1,
                }
            }
            _ => pos += 1,
        }
    }

    push(start, bytes.len(), &mut parts);
    parts
}

#[cfg(test)]
#[path = "splitter.test.rs"]
mod tests;
