//! Error types for tool scheduling.

use snafu::Location;
use snafu::Snafu;

/// Tool scheduling errors.
///
/// These never escape [`schedule`](crate::ToolScheduler::schedule);
/// they surface as terminal `error` (or `cancelled`) states on the
/// affected call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum SchedulerError {
    /// Requested tool is not in the registry.
    #[snafu(display("Tool \"{name}\" not found in registry.{suggestion}"))]
    ToolNotFound {
        name: String,
        suggestion: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// Tool rejected the request parameters.
    #[snafu(display("Invalid parameters for tool \"{tool_name}\": {message}"))]
    InvalidParams {
        tool_name: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// Confirmation was interrupted by the abort signal.
    #[snafu(display("Confirmation aborted"))]
    ConfirmationAborted {
        #[snafu(implicit)]
        location: Location,
    },

    /// Tool execution failed.
    #[snafu(display("Execution failed: {message}"))]
    ExecutionFailed {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// Oversized output could not be spilled to disk. Non-fatal: the
    /// truncated content is annotated and the file reference dropped.
    #[snafu(display("Could not save full output: {message}"))]
    OutputSpill {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// The call was cancelled via the abort signal.
    #[snafu(display("Cancelled"))]
    Cancelled {
        #[snafu(implicit)]
        location: Location,
    },

    /// Internal error.
    #[snafu(display("Internal error: {message}"))]
    Internal {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl SchedulerError {
    /// Check whether this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            SchedulerError::Cancelled { .. } | SchedulerError::ConfirmationAborted { .. }
        )
    }
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        scheduler_error::ExecutionFailedSnafu {
            message: err.to_string(),
        }
        .build()
    }
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_includes_suggestion() {
        let err = scheduler_error::ToolNotFoundSnafu {
            name: "red_file",
            suggestion: " Did you mean \"read_file\"?",
        }
        .build();
        assert_eq!(
            err.to_string(),
            "Tool \"red_file\" not found in registry. Did you mean \"read_file\"?"
        );
    }

    #[test]
    fn test_is_cancelled() {
        assert!(scheduler_error::CancelledSnafu.build().is_cancelled());
        assert!(scheduler_error::ConfirmationAbortedSnafu
            .build()
            .is_cancelled());
        assert!(!scheduler_error::ExecutionFailedSnafu { message: "x" }
            .build()
            .is_cancelled());
    }
}
