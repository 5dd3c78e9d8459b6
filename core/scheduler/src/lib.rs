//! Core tool scheduler for an AI-assistant tool-invocation runtime.
//!
//! This crate is the control plane between a model-driven orchestrator
//! producing tool requests and the effectful tools that serve them. It
//! provides:
//!
//! - **Scheduling**: [`ToolScheduler`] admits batches of requests,
//!   serializes them FIFO, and drives each call through
//!   validation → confirmation → execution → completion.
//! - **Policy**: a per-invocation security allowlist with
//!   all-or-nothing semantics for chained shell commands, plus
//!   session-wide approval modes ([`SessionPolicy`]).
//! - **Confirmation**: typed confirmation prompts with multiple
//!   outcomes, routed back to the scheduler over a channel so UI
//!   handlers never own scheduler state.
//! - **Post-processing**: deterministic head+tail truncation of
//!   oversized outputs with a persisted full copy, and conversion of
//!   heterogeneous tool payloads into function-response envelopes.
//!
//! Concrete tools, the model client, and UI widgets live in the host;
//! this crate only defines the seams they plug into
//! ([`DeclarativeTool`], [`ToolRegistry`], [`EditorBridge`]).

pub mod allowlist;
pub mod call;
pub mod config;
pub mod confirmation;
pub mod editor;
pub mod error;
pub mod registry;
pub mod response;
pub mod result_persistence;
pub mod scheduler;
pub mod suggestion;
pub mod tool;

pub use allowlist::does_invocation_match;
pub use call::CallCore;
pub use call::ToolCall;
pub use call::ToolCallStatus;
pub use config::EditorCloseFn;
pub use config::SchedulerConfig;
pub use config::SessionPolicy;
pub use config::ShellExecConfig;
pub use config::TruncationSettings;
pub use confirmation::ConfirmationDetails;
pub use confirmation::ConfirmationResponse;
pub use editor::EditorBridge;
pub use error::Result;
pub use error::SchedulerError;
pub use registry::StaticToolRegistry;
pub use registry::ToolRegistry;
pub use response::convert_to_function_response;
pub use result_persistence::truncate_and_persist;
pub use result_persistence::ProcessedOutput;
pub use scheduler::AllCallsCompleteFn;
pub use scheduler::ToolCallsUpdateFn;
pub use scheduler::ToolScheduler;
pub use suggestion::suggest_tool_names;
pub use suggestion::suggestion_phrase;
pub use tool::DeclarativeTool;
pub use tool::ToolInvocation;
pub use tool::ToolResult;
