//! Tool kind classification.

use serde::Deserialize;
use serde::Serialize;

/// Broad classification of what a tool does.
///
/// The scheduler uses the kind for policy decisions (`AutoEdit` gates
/// on [`ToolKind::Edit`]); UIs use it to pick icons and phrasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Reads files or other local state.
    Read,
    /// Proposes a file modification.
    Edit,
    /// Deletes files or other local state.
    Delete,
    /// Moves or renames files.
    Move,
    /// Searches local content.
    Search,
    /// Runs a shell command.
    Execute,
    /// Fetches remote content.
    Fetch,
    /// Talks to an external service (MCP and the like).
    Communicate,
    /// Pure reasoning helper with no side effects.
    Think,
    /// Anything else.
    #[default]
    Other,
}

impl ToolKind {
    /// Get the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Read => "read",
            ToolKind::Edit => "edit",
            ToolKind::Delete => "delete",
            ToolKind::Move => "move",
            ToolKind::Search => "search",
            ToolKind::Execute => "execute",
            ToolKind::Fetch => "fetch",
            ToolKind::Communicate => "communicate",
            ToolKind::Think => "think",
            ToolKind::Other => "other",
        }
    }

    /// Check whether tools of this kind mutate state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            ToolKind::Edit | ToolKind::Delete | ToolKind::Move | ToolKind::Execute
        )
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mutating() {
        assert!(ToolKind::Edit.is_mutating());
        assert!(ToolKind::Execute.is_mutating());
        assert!(!ToolKind::Read.is_mutating());
        assert!(!ToolKind::Think.is_mutating());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&ToolKind::Execute).unwrap(),
            "\"execute\""
        );
    }
}
