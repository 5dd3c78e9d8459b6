//! Approval modes and confirmation outcomes.
//!
//! The approval mode is a session-wide policy gating confirmations;
//! confirmation outcomes are the possible answers a user can give to a
//! single confirmation prompt.

use serde::Deserialize;
use serde::Serialize;

/// Session-wide policy gating tool confirmations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalMode {
    /// Prompt on every call that is not pre-authorized.
    #[default]
    Default,
    /// Skip confirmation for edit-kind tools.
    AutoEdit,
    /// Skip all confirmations.
    Yolo,
}

impl ApprovalMode {
    /// Get the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalMode::Default => "default",
            ApprovalMode::AutoEdit => "auto-edit",
            ApprovalMode::Yolo => "yolo",
        }
    }

    /// Check whether every confirmation is skipped.
    pub fn skips_all_confirmations(&self) -> bool {
        matches!(self, ApprovalMode::Yolo)
    }

    /// Check whether edit-kind confirmations are skipped.
    pub fn auto_accepts_edits(&self) -> bool {
        matches!(self, ApprovalMode::AutoEdit | ApprovalMode::Yolo)
    }
}

impl std::fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    /// Proceed with this call only.
    ProceedOnce,
    /// Proceed and stop prompting for this class of call.
    ProceedAlways,
    /// Proceed and stop prompting for anything from this MCP server.
    ProceedAlwaysServer,
    /// Proceed and stop prompting for this specific MCP tool.
    ProceedAlwaysTool,
    /// Open the proposed change in an external editor before deciding.
    ModifyWithEditor,
    /// Do not run the call.
    Cancel,
}

impl ConfirmationOutcome {
    /// Check whether the outcome lets the call run.
    pub fn is_proceed(&self) -> bool {
        !matches!(
            self,
            ConfirmationOutcome::Cancel | ConfirmationOutcome::ModifyWithEditor
        )
    }

    /// Check whether the outcome cancels the call.
    pub fn is_cancel(&self) -> bool {
        matches!(self, ConfirmationOutcome::Cancel)
    }

    /// Check whether the outcome broadens future approvals.
    pub fn is_always(&self) -> bool {
        matches!(
            self,
            ConfirmationOutcome::ProceedAlways
                | ConfirmationOutcome::ProceedAlwaysServer
                | ConfirmationOutcome::ProceedAlwaysTool
        )
    }
}

/// Optional payload riding on a confirmation outcome.
///
/// Carries user-revised content for modifiable tools when the outcome
/// is [`ConfirmationOutcome::ProceedOnce`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationPayload {
    /// Replacement for the tool's proposed content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_content: Option<String>,
}

impl ConfirmationPayload {
    /// Create a payload carrying revised content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            updated_content: Some(content.into()),
        }
    }
}

#[cfg(test)]
#[path = "approval.test.rs"]
mod tests;
