//! Protocol types for the relay tool scheduler.
//!
//! This crate provides the foundational types used across the relay
//! workspace:
//! - Tool-call requests and the prompt grouping they carry
//! - Approval modes and confirmation outcomes
//! - The model-facing `Part` / function-response envelope
//! - Human-renderable result displays (markdown and diffs)
//! - Confirmation request payloads exchanged with the host UI

pub mod approval;
pub mod confirmation;
pub mod display;
pub mod kind;
pub mod part;
pub mod request;

pub use approval::ApprovalMode;
pub use approval::ConfirmationOutcome;
pub use approval::ConfirmationPayload;
pub use confirmation::ConfirmationKind;
pub use confirmation::ConfirmationRequest;
pub use display::FileDiff;
pub use display::ResultDisplay;
pub use kind::ToolKind;
pub use part::Blob;
pub use part::FileData;
pub use part::FunctionResponse;
pub use part::FunctionResponseBody;
pub use part::LlmContent;
pub use part::Part;
pub use request::ToolRequest;
