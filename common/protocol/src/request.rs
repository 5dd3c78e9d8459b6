//! Tool-call requests issued by the model-driven orchestrator.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// A single tool-call request within a batch.
///
/// Requests are immutable once constructed; all per-call mutable state
/// lives in the scheduler's call records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Unique identifier for this call within its batch.
    pub call_id: String,
    /// Registry name of the requested tool.
    pub name: String,
    /// Opaque structured parameters for the tool.
    pub args: Value,
    /// True when the request was synthesized internally rather than
    /// produced by the model.
    #[serde(default)]
    pub is_client_initiated: bool,
    /// Groups calls issued from one model turn.
    pub prompt_id: String,
}

impl ToolRequest {
    /// Create a model-originated request.
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        args: Value,
        prompt_id: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            args,
            is_client_initiated: false,
            prompt_id: prompt_id.into(),
        }
    }

    /// Create a client-initiated request (synthesized internally, e.g.
    /// by a slash command rather than the model).
    pub fn client_initiated(
        call_id: impl Into<String>,
        name: impl Into<String>,
        args: Value,
        prompt_id: impl Into<String>,
    ) -> Self {
        Self {
            is_client_initiated: true,
            ..Self::new(call_id, name, args, prompt_id)
        }
    }
}

#[cfg(test)]
#[path = "request.test.rs"]
mod tests;
