//! External-editor integration seam.
//!
//! The concrete diff editor is a host concern; the scheduler only
//! needs a way to ask for a revision of proposed content when the user
//! picks `ModifyWithEditor`.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Bridges `ModifyWithEditor` outcomes to a host-provided diff editor.
#[async_trait]
pub trait EditorBridge: Send + Sync {
    /// The user's preferred editor, or `None` when no editor is
    /// available (the outcome is then ignored).
    fn preferred_editor(&self) -> Option<String>;

    /// Open a diff view for the proposed change and block until the
    /// editor closes.
    ///
    /// Returns the revised proposed content, or `None` when the user
    /// left it unchanged.
    async fn open_diff(
        &self,
        file_path: &Path,
        original: &str,
        proposed: &str,
    ) -> Result<Option<String>>;
}
