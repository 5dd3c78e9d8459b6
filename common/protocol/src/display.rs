//! Human-renderable result payloads.
//!
//! Separate from the model-facing function response: the display is
//! what the host UI shows, and for diff-producing tools it survives
//! cancellation so the user can still see what would have changed.

use serde::Deserialize;
use serde::Serialize;

/// A proposed or applied file change, rendered as a unified diff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Unified diff text.
    pub file_diff: String,
    /// Basename of the affected file.
    pub file_name: String,
    /// Content before the change, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    /// Content after the change, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
}

/// Renderable outcome of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultDisplay {
    /// Free-form markdown.
    Markdown {
        /// The markdown text.
        markdown: String,
    },
    /// A file diff.
    Diff {
        /// The diff payload.
        diff: FileDiff,
    },
}

impl ResultDisplay {
    /// Create a markdown display.
    pub fn markdown(text: impl Into<String>) -> Self {
        ResultDisplay::Markdown {
            markdown: text.into(),
        }
    }

    /// Create a diff display.
    pub fn diff(diff: FileDiff) -> Self {
        ResultDisplay::Diff { diff }
    }

    /// The diff payload, if this display is one.
    pub fn as_diff(&self) -> Option<&FileDiff> {
        match self {
            ResultDisplay::Diff { diff } => Some(diff),
            ResultDisplay::Markdown { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_diff() {
        let diff = FileDiff {
            file_diff: "--- a\n+++ b".to_string(),
            file_name: "b.txt".to_string(),
            original_content: None,
            new_content: None,
        };
        let display = ResultDisplay::diff(diff.clone());
        assert_eq!(display.as_diff(), Some(&diff));
        assert_eq!(ResultDisplay::markdown("ok").as_diff(), None);
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(ResultDisplay::markdown("done")).unwrap();
        assert_eq!(json["type"], "markdown");
    }
}
