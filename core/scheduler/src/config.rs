//! Scheduler configuration and session-wide policy.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use relay_protocol::ApprovalMode;
use serde::Deserialize;
use serde::Serialize;

use crate::editor::EditorBridge;
use crate::registry::ToolRegistry;

/// Callback fired after an external-editor round trip closes.
pub type EditorCloseFn = Arc<dyn Fn() + Send + Sync>;

/// Byte and line limits for oversized-output truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationSettings {
    /// Outputs above this many bytes are truncated and spilled.
    pub threshold: i64,
    /// Total lines kept in the truncated excerpt.
    pub truncate_lines: i32,
}

impl Default for TruncationSettings {
    fn default() -> Self {
        Self {
            threshold: 4_000_000,
            truncate_lines: 1000,
        }
    }
}

/// Shell execution configuration shared with shell tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellExecConfig {
    /// Command roots whose allowlist granularity extends one
    /// sub-command deeper (see `relay_shell_parser::command_prefix`).
    pub stemmables: Vec<String>,
}

impl Default for ShellExecConfig {
    fn default() -> Self {
        let stemmables = [
            "git", "cargo", "npm", "npx", "pnpm", "yarn", "gh", "gh run", "gh pr", "docker",
            "kubectl",
        ];
        Self {
            stemmables: stemmables.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Process-wide approval state.
///
/// Mutated by `ProceedAlways` outcomes mid-batch; every later
/// confirmation check reads through these locks rather than caching
/// (a `ProceedAlways` must affect the rest of its own batch).
#[derive(Debug, Default)]
pub struct SessionPolicy {
    approval_mode: RwLock<ApprovalMode>,
    allowlist: RwLock<Vec<String>>,
}

impl SessionPolicy {
    /// Create a policy in the given mode with an empty allowlist.
    pub fn new(mode: ApprovalMode) -> Self {
        Self {
            approval_mode: RwLock::new(mode),
            allowlist: RwLock::new(Vec::new()),
        }
    }

    /// Create a policy with pre-authorized patterns.
    pub fn with_allowlist(mode: ApprovalMode, patterns: Vec<String>) -> Self {
        Self {
            approval_mode: RwLock::new(mode),
            allowlist: RwLock::new(patterns),
        }
    }

    /// The current approval mode.
    pub fn approval_mode(&self) -> ApprovalMode {
        *self.approval_mode.read().expect("approval mode lock")
    }

    /// Replace the approval mode.
    pub fn set_approval_mode(&self, mode: ApprovalMode) {
        *self.approval_mode.write().expect("approval mode lock") = mode;
    }

    /// Snapshot of the current allowlist patterns.
    pub fn allowlist(&self) -> Vec<String> {
        self.allowlist.read().expect("allowlist lock").clone()
    }

    /// Append a pattern to the session allowlist.
    pub fn allow(&self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        let mut list = self.allowlist.write().expect("allowlist lock");
        if !list.contains(&pattern) {
            list.push(pattern);
        }
    }
}

/// Everything a scheduler needs from its host.
#[derive(Clone)]
pub struct SchedulerConfig {
    /// Tool lookup.
    pub registry: Arc<dyn ToolRegistry>,
    /// Session-wide approval mode and allowlist.
    pub policy: Arc<SessionPolicy>,
    /// Directory for spilled oversized outputs.
    pub temp_dir: PathBuf,
    /// Truncation limits.
    pub truncation: TruncationSettings,
    /// Shell execution configuration.
    pub shell: ShellExecConfig,
    /// External diff-editor integration, when the host provides one.
    pub editor: Option<Arc<dyn EditorBridge>>,
    /// Fired after an external-editor round trip closes.
    pub on_editor_close: Option<EditorCloseFn>,
}

impl SchedulerConfig {
    /// Create a configuration with default policy and limits.
    pub fn new(registry: Arc<dyn ToolRegistry>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            policy: Arc::new(SessionPolicy::default()),
            temp_dir: temp_dir.into(),
            truncation: TruncationSettings::default(),
            shell: ShellExecConfig::default(),
            editor: None,
            on_editor_close: None,
        }
    }

    /// Set the session policy.
    pub fn with_policy(mut self, policy: Arc<SessionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Set the truncation limits.
    pub fn with_truncation(mut self, truncation: TruncationSettings) -> Self {
        self.truncation = truncation;
        self
    }

    /// Set the shell execution configuration.
    pub fn with_shell(mut self, shell: ShellExecConfig) -> Self {
        self.shell = shell;
        self
    }

    /// Set the external editor integration.
    pub fn with_editor(mut self, editor: Arc<dyn EditorBridge>) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Set the editor-close callback.
    pub fn with_on_editor_close(mut self, callback: EditorCloseFn) -> Self {
        self.on_editor_close = Some(callback);
        self
    }
}

impl std::fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("temp_dir", &self.temp_dir)
            .field("truncation", &self.truncation)
            .field("shell", &self.shell)
            .field("has_editor", &self.editor.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_defaults() {
        let settings = TruncationSettings::default();
        assert_eq!(settings.threshold, 4_000_000);
        assert_eq!(settings.truncate_lines, 1000);
    }

    #[test]
    fn test_session_policy_read_through() {
        let policy = SessionPolicy::default();
        assert_eq!(policy.approval_mode(), ApprovalMode::Default);

        policy.set_approval_mode(ApprovalMode::AutoEdit);
        assert_eq!(policy.approval_mode(), ApprovalMode::AutoEdit);
    }

    #[test]
    fn test_allowlist_appends_without_duplicates() {
        let policy = SessionPolicy::default();
        policy.allow("run_shell_command(git status)");
        policy.allow("run_shell_command(git status)");
        policy.allow("my_server");
        assert_eq!(
            policy.allowlist(),
            vec!["run_shell_command(git status)", "my_server"]
        );
    }

    #[test]
    fn test_default_stemmables_include_multi_word_entries() {
        let shell = ShellExecConfig::default();
        assert!(shell.stemmables.iter().any(|s| s == "gh run"));
    }
}
