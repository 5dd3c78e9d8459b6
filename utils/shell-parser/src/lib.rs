//! Quote-aware shell command lexing.
//!
//! This crate provides the small amount of shell lexing the scheduler's
//! security checks are built on:
//!
//! - **Sub-command splitting**: break a command string into the
//!   independent sub-commands joined by `&&`, `||`, `|`, and `;` at the
//!   top level, honoring quoting and backslash escapes.
//! - **Word splitting**: whitespace tokenization that keeps quoted
//!   spans intact.
//! - **Prefix extraction**: compute the canonical allowlist key for a
//!   command (root plus recognized sub-command).
//!
//! The splitter deliberately does *not* interpret redirections or
//! parameter expansion. It is a separator lexer, nothing more: its only
//! job is to make sure an allowlist check sees every sub-command a
//! shell would run.
//!
//! # Quick Start
//!
//! ```
//! use relay_shell_parser::{command_prefix, split_commands};
//!
//! let parts = split_commands("echo foo && echo 'a | b'");
//! assert_eq!(parts, vec!["echo foo", "echo 'a | b'"]);
//!
//! let stems = ["git", "gh", "gh run"];
//! assert_eq!(command_prefix("git status -v", &stems), "git status");
//! ```

mod prefix;
mod splitter;
mod words;

pub use prefix::command_prefix;
pub use splitter::split_commands;
pub use words::split_words;
