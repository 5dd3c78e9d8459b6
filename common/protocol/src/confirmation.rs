//! Confirmation request payloads.
//!
//! A tool that needs user sign-off describes the pending action with a
//! [`ConfirmationRequest`]; the scheduler wraps it with a response
//! channel before handing it to the host UI.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// What a confirmation prompt is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfirmationKind {
    /// A proposed file edit.
    Edit {
        /// Basename of the file being edited.
        file_name: String,
        /// Absolute path of the file being edited.
        file_path: PathBuf,
        /// Unified diff of the proposed change.
        file_diff: String,
        /// Content before the change.
        original_content: String,
        /// Content after the change.
        new_content: String,
        /// True while the proposal is being revised in an editor.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_modifying: Option<bool>,
    },
    /// A shell command.
    Exec {
        /// The full command string.
        command: String,
        /// The command's allowlist key (root plus recognized
        /// sub-command).
        root_command: String,
    },
    /// An MCP tool call.
    Mcp {
        /// Name of the MCP server.
        server_name: String,
        /// Registry name of the tool.
        tool_name: String,
        /// Human-facing tool name.
        tool_display_name: String,
    },
    /// A free-form informational prompt (e.g. before a web fetch).
    Info {
        /// The question put to the user.
        prompt: String,
        /// URLs the action would touch, when applicable.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        urls: Option<Vec<String>>,
    },
}

impl ConfirmationKind {
    /// Check whether this is an edit confirmation.
    pub fn is_edit(&self) -> bool {
        matches!(self, ConfirmationKind::Edit { .. })
    }

    /// The pending diff for edit confirmations.
    pub fn pending_diff(&self) -> Option<(&str, &str)> {
        match self {
            ConfirmationKind::Edit {
                file_diff,
                file_name,
                ..
            } => Some((file_diff, file_name)),
            _ => None,
        }
    }
}

/// A request for user confirmation of a pending tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    /// Short title for the prompt.
    pub title: String,
    /// What the prompt is about.
    #[serde(flatten)]
    pub kind: ConfirmationKind,
}

impl ConfirmationRequest {
    /// Create a confirmation request.
    pub fn new(title: impl Into<String>, kind: ConfirmationKind) -> Self {
        Self {
            title: title.into(),
            kind,
        }
    }
}

#[cfg(test)]
#[path = "confirmation.test.rs"]
mod tests;
